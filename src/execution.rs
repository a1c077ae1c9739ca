//! Query execution and result validation.

use serde::Serialize;
use tracing::debug;

use crate::engine::{Engine, Row, SqlParam};
use crate::error::{AnalyzerError, AnalyzerResult};

/// A composed report query, built fresh for each call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportQuery {
    /// Final SQL text, including any CTE prelude.
    pub sql: String,
    /// Values bound to `$1`, `$2`, ... in order.
    pub params: Vec<SqlParam>,
}

impl ReportQuery {
    pub fn new(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Run `query` and return its rows.
///
/// Zero rows is reported as [`AnalyzerError::EmptyResult`]; engine failures
/// pass through unchanged.
pub fn execute<E: Engine + ?Sized>(
    engine: &E,
    report: &str,
    query: &ReportQuery,
) -> AnalyzerResult<Vec<Row>> {
    let rows = engine.query(&query.sql, &query.params)?;
    debug!(report = report, engine = engine.name(), rows = rows.len(), "executed report query");

    if rows.is_empty() {
        return Err(AnalyzerError::empty_result(report));
    }
    Ok(rows)
}
