//! Engine boundary.
//!
//! The analytical engine is an opaque SQL executor. The composition layer
//! only needs two things from it: run a statement batch (`CREATE TABLE ...
//! AS`) and run a query with positionally bound parameters. Anything that
//! satisfies [`Engine`] can back a session; [`DuckDbEngine`] is the one the
//! binary uses.

mod duckdb_engine;

pub use duckdb_engine::DuckDbEngine;

use serde::Serialize;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures reported by the engine. These propagate to the caller unmodified.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    /// Failure from a non-DuckDB engine implementation.
    #[error("engine error: {0}")]
    Other(String),
}

// ============================================================================
// Parameters
// ============================================================================

/// A value bound to a positional placeholder (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<u32> for SqlParam {
    fn from(v: u32) -> Self {
        SqlParam::Int(i64::from(v))
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl std::fmt::Display for SqlParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlParam::Int(v) => write!(f, "{}", v),
            SqlParam::Text(s) => write!(f, "{:?}", s),
        }
    }
}

// ============================================================================
// Result values
// ============================================================================

/// A single result cell, independent of the engine's native value type.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Text(String),
    List(Vec<CellValue>),
    /// Engine values with no dedicated variant, already in display form.
    Other(String),
}

impl std::fmt::Display for CellValue {
    /// Display form used in result tables.
    ///
    /// Lists render as `[a, b, c]`; NULL renders as `NULL`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) | CellValue::Other(s) => f.write_str(s),
            CellValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(i128::from(v))
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(i128::from(v))
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}

/// One result row; arity is fixed per query.
pub type Row = Vec<CellValue>;

// ============================================================================
// Engine trait
// ============================================================================

/// An analytical SQL executor.
///
/// Implementations are used from a single thread; every call blocks until
/// the engine finishes.
pub trait Engine {
    /// Short engine name for logs.
    fn name(&self) -> &'static str;

    /// Run one or more statements that return no rows.
    fn execute_batch(&self, sql: &str) -> EngineResult<()>;

    /// Run a query with positionally bound parameters and fetch every row.
    fn query(&self, sql: &str, params: &[SqlParam]) -> EngineResult<Vec<Row>>;

    /// Make sure remote (http/https) sources can be read.
    fn enable_remote_sources(&self) -> EngineResult<()> {
        Ok(())
    }

    /// Release the engine, surfacing any error the release produces.
    fn close(self) -> EngineResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}
