//! Logical tables and their defining queries.
//!
//! A logical table is a named relation described by one defining query.
//! Whether it ends up as a persisted table or an inline CTE is decided by
//! the materialization strategy in [`crate::compose`], never here.

use crate::dataset::{Dataset, ResolvedSources};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::sql::{is_plain_ident, quote_ident, quote_literal};

/// Raw service events, one row per stop.
pub const SERVICES: &str = "services";
/// Service counts per month and station.
pub const SERVICES_PER_MONTH: &str = "services_per_month";
/// Station metadata.
pub const STATIONS: &str = "stations";
/// Wide tariff distance matrix, one column per destination station.
pub const DISTANCES: &str = "distances";
/// Unpivoted distances, one row per station pair.
pub const DISTANCES_LONG: &str = "distances_long";

/// Token the distance file uses for "no tariff distance".
const DISTANCE_NULL_TOKEN: &str = "XXX";

/// When a table's rows are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialization {
    /// Always derived at the point of use, even in local mode.
    OnDemand,
    /// Created once at session start in local mode.
    EagerInLocalMode,
}

/// A logical table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub query: String,
    /// Logical tables the defining query reads by name.
    pub depends_on: Vec<String>,
    pub materialization: Materialization,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into().trim().to_string(),
            depends_on: Vec::new(),
            materialization: Materialization::EagerInLocalMode,
        }
    }

    pub fn depends_on(mut self, table: &str) -> Self {
        self.depends_on.push(table.to_string());
        self
    }

    pub fn on_demand(mut self) -> Self {
        self.materialization = Materialization::OnDemand;
        self
    }

    pub fn is_eager(&self) -> bool {
        self.materialization == Materialization::EagerInLocalMode
    }
}

/// Registry of logical tables in dependency order.
///
/// A table can only be registered after every table it depends on, so
/// iteration order is always a valid creation order.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    definitions: Vec<TableDefinition>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard tables, with defining queries templated on `sources`.
    pub fn standard(sources: &ResolvedSources) -> AnalyzerResult<Self> {
        let services = quote_literal(sources.get(Dataset::Services));
        let stations = quote_literal(sources.get(Dataset::Stations));
        let distances = quote_literal(sources.get(Dataset::Distances));

        let mut registry = Self::new();
        registry.register(TableDefinition::new(SERVICES, format!("FROM {}", services)))?;
        registry.register(TableDefinition::new(
            SERVICES_PER_MONTH,
            format!(
                "SELECT\n    month({date}) AS month,\n    {station} AS station,\n    count(*) AS num_services\nFROM {services}\nGROUP BY ALL",
                date = quote_ident("Service:Date"),
                station = quote_ident("Stop:station name"),
                services = services,
            ),
        ))?;
        registry.register(TableDefinition::new(STATIONS, format!("FROM {}", stations)))?;
        registry.register(TableDefinition::new(
            DISTANCES,
            format!(
                "FROM read_csv({}, nullstr = {})",
                distances,
                quote_literal(DISTANCE_NULL_TOKEN)
            ),
        ))?;
        registry.register(
            TableDefinition::new(
                DISTANCES_LONG,
                format!(
                    "UNPIVOT {}\nON COLUMNS(* EXCLUDE station)\nINTO NAME other_station VALUE distance",
                    DISTANCES
                ),
            )
            .depends_on(DISTANCES),
        )?;
        Ok(registry)
    }

    /// Add a definition.
    ///
    /// Fails if the name is not a plain identifier, is already registered,
    /// or depends on a table that is not registered yet.
    pub fn register(&mut self, definition: TableDefinition) -> AnalyzerResult<()> {
        if !is_plain_ident(&definition.name) {
            return Err(AnalyzerError::configuration(format!(
                "invalid table name '{}'",
                definition.name
            )));
        }
        if self.contains(&definition.name) {
            return Err(AnalyzerError::configuration(format!(
                "table '{}' is defined twice",
                definition.name
            )));
        }
        if let Some(missing) = definition.depends_on.iter().find(|d| !self.contains(d)) {
            return Err(AnalyzerError::configuration(format!(
                "table '{}' depends on undefined table '{}'",
                definition.name, missing
            )));
        }
        self.definitions.push(definition);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }

    /// The definition of `name`, or a configuration error if none exists.
    pub fn definition(&self, name: &str) -> AnalyzerResult<&TableDefinition> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| {
                AnalyzerError::configuration(format!("no defining query for table '{}'", name))
            })
    }

    /// `name` and everything it transitively reads, in creation order.
    pub fn dependency_closure(&self, name: &str) -> AnalyzerResult<Vec<&TableDefinition>> {
        let mut needed = vec![self.definition(name)?.name.as_str()];
        let mut i = 0;
        while i < needed.len() {
            let def = self.definition(needed[i])?;
            for dep in &def.depends_on {
                if !needed.contains(&dep.as_str()) {
                    needed.push(dep.as_str());
                }
            }
            i += 1;
        }

        Ok(self
            .definitions
            .iter()
            .filter(|d| needed.contains(&d.name.as_str()))
            .collect())
    }

    /// Definitions in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &TableDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
