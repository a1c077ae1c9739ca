//! Materialization strategies.

use tracing::info;

use crate::engine::Engine;
use crate::error::AnalyzerResult;
use crate::sql::{with_prelude, Cte};
use crate::tables::TableRegistry;

/// Decides how a logical table is made available to a report query.
pub trait MaterializationStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The CTEs a query reading `table` must carry, in creation order.
    ///
    /// An empty list means the table can be referenced by name as-is. A
    /// table with no registered definition is a configuration error.
    fn materialize(&self, registry: &TableRegistry, table: &str) -> AnalyzerResult<Vec<Cte>>;
}

/// Creates every eager table once, then lets reports reference them by name.
#[derive(Debug, Default)]
pub struct EagerMaterialization {
    created: Vec<String>,
}

impl EagerMaterialization {
    /// Create each eager table in `registry`, in creation order.
    ///
    /// On-demand inputs of an eager table are inlined into its `CREATE
    /// TABLE` statement. Stops at the first engine failure; tables created
    /// before it stay in the engine's namespace until the session is
    /// dropped.
    pub fn start<E: Engine + ?Sized>(engine: &E, registry: &TableRegistry) -> AnalyzerResult<Self> {
        let mut created = Vec::new();
        for definition in registry.iter().filter(|d| d.is_eager()) {
            info!(table = %definition.name, "materializing table");
            let query = with_prelude(&on_demand_ctes(registry, &definition.name)?, &definition.query);
            engine.execute_batch(&format!(
                "CREATE TABLE {} AS (\n{}\n)",
                definition.name, query
            ))?;
            created.push(definition.name.clone());
        }
        Ok(Self { created })
    }

    /// A strategy for tables that were created elsewhere.
    pub fn assume_started() -> Self {
        Self::default()
    }

    /// Tables created by [`EagerMaterialization::start`].
    pub fn created(&self) -> &[String] {
        &self.created
    }
}

impl MaterializationStrategy for EagerMaterialization {
    fn name(&self) -> &'static str {
        "eager"
    }

    fn materialize(&self, registry: &TableRegistry, table: &str) -> AnalyzerResult<Vec<Cte>> {
        on_demand_ctes(registry, table)
    }
}

/// CTEs for the on-demand tables in `table`'s dependency closure.
///
/// On-demand tables are never created, so they are inlined wherever they
/// are read; eager tables are referenced by name.
fn on_demand_ctes(registry: &TableRegistry, table: &str) -> AnalyzerResult<Vec<Cte>> {
    Ok(registry
        .dependency_closure(table)?
        .into_iter()
        .filter(|d| !d.is_eager())
        .map(|d| Cte::new(&d.name, &d.query))
        .collect())
}

/// Inlines every table a report needs as a CTE, on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct LazyMaterialization;

impl MaterializationStrategy for LazyMaterialization {
    fn name(&self) -> &'static str {
        "lazy"
    }

    fn materialize(&self, registry: &TableRegistry, table: &str) -> AnalyzerResult<Vec<Cte>> {
        Ok(registry
            .dependency_closure(table)?
            .into_iter()
            .map(|d| Cte::new(&d.name, &d.query))
            .collect())
    }
}
