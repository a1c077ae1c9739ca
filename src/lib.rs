//! # Railstats
//!
//! Reporting over the Dutch railway open datasets (train services, stations
//! and tariff distances) on an embedded DuckDB engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           Dataset catalog (local path / remote URL)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolve by mode]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Table registry (logical table -> defining SQL)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [materialization strategy]
//! ┌─────────────────────────────────────────────────────────┐
//! │   local: CREATE TABLE up front │ remote: WITH prelude    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [report body + params]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Engine execution -> ResultTable -> render       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use railstats::{Analyzer, DatasetCatalog, Mode};
//! use railstats::render::render_table;
//!
//! let analyzer = Analyzer::open(Mode::Remote, &DatasetCatalog::default())?;
//! let table = analyzer.top_stations_in_period(3, 1, 12)?;
//! println!("{}", render_table(&table));
//! analyzer.close()?;
//! # Ok::<(), railstats::AnalyzerError>(())
//! ```

pub mod compose;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod execution;
pub mod render;
pub mod report;
pub mod session;
pub mod sql;
pub mod table;
pub mod tables;

pub use dataset::{Dataset, DatasetCatalog, Mode};
pub use error::{AnalyzerError, AnalyzerResult};
pub use report::Report;
pub use session::Analyzer;
pub use sql::SortDir;
pub use table::{ResultTable, TableBuilder};
