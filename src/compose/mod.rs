//! Report query composition.
//!
//! A report body names the logical tables it reads. How those names become
//! rows is a [`MaterializationStrategy`], picked once per session:
//!
//! ```text
//!                   ┌──────────────────────────────┐
//!   local mode  ──► │ EagerMaterialization          │  CREATE TABLE <name> AS (...)
//!                   │   at session start            │  report body used as-is
//!                   └──────────────────────────────┘
//!                   ┌──────────────────────────────┐
//!   remote mode ──► │ LazyMaterialization           │  WITH <name> AS (...)
//!                   │   on every report call        │  <report body>
//!                   └──────────────────────────────┘
//! ```
//!
//! Lazy composition re-evaluates each defining query (and any remote scan
//! in it) on every report call that needs the table.

mod strategy;

pub use strategy::{EagerMaterialization, LazyMaterialization, MaterializationStrategy};

use tracing::debug;

use crate::dataset::Mode;
use crate::error::AnalyzerResult;
use crate::sql::{with_prelude, Cte};
use crate::tables::TableRegistry;

/// Builds final report SQL from a body and the tables it requires.
pub struct QueryComposer {
    registry: TableRegistry,
    strategy: Box<dyn MaterializationStrategy>,
}

impl QueryComposer {
    pub fn new(registry: TableRegistry, strategy: Box<dyn MaterializationStrategy>) -> Self {
        Self { registry, strategy }
    }

    /// A composer for `mode` that assumes eager tables already exist.
    ///
    /// Useful for inspecting composed SQL without an engine; sessions use
    /// [`EagerMaterialization::start`] instead.
    pub fn planned(mode: Mode, registry: TableRegistry) -> Self {
        let strategy: Box<dyn MaterializationStrategy> = match mode {
            Mode::Local => Box::new(EagerMaterialization::assume_started()),
            Mode::Remote => Box::new(LazyMaterialization),
        };
        Self::new(registry, strategy)
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Compose the query for a body that reads one logical table.
    pub fn compose_report_query(&self, base_query: &str, table: &str) -> AnalyzerResult<String> {
        self.compose(base_query, &[table])
    }

    /// Compose the query for a body that reads several logical tables.
    ///
    /// Every CTE the strategy asks for goes into a single `WITH` clause,
    /// once, with dependencies ahead of the tables that read them.
    pub fn compose(&self, base_query: &str, tables: &[&str]) -> AnalyzerResult<String> {
        let mut ctes: Vec<Cte> = Vec::new();
        for table in tables {
            for cte in self.strategy.materialize(&self.registry, table)? {
                if !ctes.iter().any(|c| c.name == cte.name) {
                    ctes.push(cte);
                }
            }
        }

        // Keep registry (creation) order so a CTE never precedes its inputs.
        ctes.sort_by_key(|c| {
            self.registry
                .iter()
                .position(|d| d.name == c.name)
                .unwrap_or(usize::MAX)
        });

        let sql = with_prelude(&ctes, base_query);
        debug!(
            strategy = self.strategy.name(),
            ctes = ctes.len(),
            "composed report query:\n{}",
            sql
        );
        Ok(sql)
    }
}
