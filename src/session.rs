//! Analyzer sessions.
//!
//! An [`Analyzer`] owns one engine connection and one table namespace for
//! its whole life. Its [`Mode`] is fixed at construction and selects both
//! the dataset sources and the materialization strategy; report methods
//! never look at the mode again.

use tracing::{debug, info};

use crate::compose::{
    EagerMaterialization, LazyMaterialization, MaterializationStrategy, QueryComposer,
};
use crate::dataset::{DatasetCatalog, Mode, ResolvedSources};
use crate::engine::{DuckDbEngine, Engine};
use crate::error::AnalyzerResult;
use crate::execution::{execute, ReportQuery};
use crate::report::{
    BusiestByMonth, DatasetRowCounts, DistanceListing, Report, StationListing, StationPairs,
    TopStationsInPeriod,
};
use crate::sql::SortDir;
use crate::table::{ResultTable, TableBuilder};
use crate::tables::TableRegistry;

/// A reporting session over one engine connection.
///
/// Dropping the session releases the connection on every path, including
/// a failed [`Analyzer::open`]; [`Analyzer::close`] does the same but
/// reports close errors.
pub struct Analyzer<E: Engine = DuckDbEngine> {
    mode: Mode,
    sources: ResolvedSources,
    composer: QueryComposer,
    engine: E,
}

impl Analyzer<DuckDbEngine> {
    /// Open a session on a fresh in-memory DuckDB database.
    pub fn open(mode: Mode, catalog: &DatasetCatalog) -> AnalyzerResult<Self> {
        Self::with_engine(DuckDbEngine::open_in_memory()?, mode, catalog)
    }
}

impl<E: Engine> Analyzer<E> {
    /// Open a session on `engine` with the standard tables.
    pub fn with_engine(engine: E, mode: Mode, catalog: &DatasetCatalog) -> AnalyzerResult<Self> {
        let sources = catalog.resolve_all(mode);
        let registry = TableRegistry::standard(&sources)?;
        Self::with_registry(engine, sources, registry)
    }

    /// Open a session on `engine` with a custom table registry.
    pub fn with_registry(
        engine: E,
        sources: ResolvedSources,
        registry: TableRegistry,
    ) -> AnalyzerResult<Self> {
        let mode = sources.mode;
        if mode.is_remote() {
            engine.enable_remote_sources()?;
        }

        let strategy: Box<dyn MaterializationStrategy> = match mode {
            Mode::Local => Box::new(EagerMaterialization::start(&engine, &registry)?),
            Mode::Remote => Box::new(LazyMaterialization),
        };
        info!(
            mode = %mode,
            engine = engine.name(),
            strategy = strategy.name(),
            tables = registry.len(),
            "session opened"
        );

        Ok(Self {
            mode,
            sources,
            composer: QueryComposer::new(registry, strategy),
            engine,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sources(&self) -> &ResolvedSources {
        &self.sources
    }

    pub fn composer(&self) -> &QueryComposer {
        &self.composer
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Compose the final query for `report` without running it.
    pub fn compose(&self, report: &dyn Report) -> AnalyzerResult<ReportQuery> {
        let sql = self
            .composer
            .compose(&report.body(), report.required_tables())?;
        Ok(ReportQuery::new(sql, report.params()))
    }

    /// Compose, execute and tabulate `report`.
    pub fn run(&self, report: &dyn Report) -> AnalyzerResult<ResultTable> {
        debug!(report = report.name(), "running report");
        let query = self.compose(report)?;
        let rows = execute(&self.engine, report.name(), &query)?;

        let mut builder = TableBuilder::new(report.title());
        builder.declare_columns(report.columns().iter().copied());
        builder.set_rows(&rows)?;
        builder.build()
    }

    /// Busiest station in each month up to `month_cutoff`.
    pub fn busiest_by_month(&self, month_cutoff: u32) -> AnalyzerResult<ResultTable> {
        self.run(&BusiestByMonth { month_cutoff })
    }

    /// Top `n` stations in each month between `start` and `end`.
    pub fn top_stations_in_period(&self, n: u32, start: u32, end: u32) -> AnalyzerResult<ResultTable> {
        self.run(&TopStationsInPeriod { n, start, end })
    }

    pub fn stations(&self, limit: u32) -> AnalyzerResult<ResultTable> {
        self.run(&StationListing { limit })
    }

    pub fn distances(&self, limit: u32) -> AnalyzerResult<ResultTable> {
        self.run(&DistanceListing { limit })
    }

    /// Domestic station pairs by distance (`Desc` for furthest first).
    pub fn station_pairs(&self, order: SortDir, limit: u32) -> AnalyzerResult<ResultTable> {
        self.run(&StationPairs { order, limit })
    }

    /// Row count of each dataset source.
    pub fn row_counts(&self) -> AnalyzerResult<ResultTable> {
        self.run(&DatasetRowCounts::new(self.sources.clone()))
    }

    /// End the session, surfacing any error from releasing the engine.
    pub fn close(self) -> AnalyzerResult<()> {
        info!(mode = %self.mode, "closing session");
        self.engine.close()?;
        Ok(())
    }

    /// End the session and hand back the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }
}
