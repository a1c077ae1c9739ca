//! Error types for report composition and execution.
//!
//! Every failure is raised to the immediate caller of a report method;
//! nothing here is retried or degraded into a partial result.

use crate::config::SettingsError;
use crate::engine::EngineError;

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Errors surfaced by the query composition and execution layer.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// A defect in the static table/dataset registry, not user input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The query ran but produced no rows.
    #[error("report '{report}' returned no rows")]
    EmptyResult {
        /// Name of the report whose query came back empty.
        report: String,
    },

    /// A result row does not have one cell per declared column.
    #[error("mismatched column count: got {got}, expected {expected}")]
    SchemaMismatch {
        /// Number of cells in the offending row.
        got: usize,
        /// Number of declared columns.
        expected: usize,
    },

    /// Any failure reported by the analytical engine, passed through as-is.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl AnalyzerError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an empty-result error for the named report.
    pub fn empty_result(report: impl Into<String>) -> Self {
        Self::EmptyResult {
            report: report.into(),
        }
    }

    /// Check if this error is a registry/configuration defect.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this error means the query succeeded with zero rows.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }
}
