//! SQL text construction.
//!
//! Report bodies and table definitions are written as fixed DuckDB SQL text.
//! The only values ever spliced into that text are identifiers and resolved
//! dataset sources, and they go through the helpers in this module:
//!
//! - [`quote`] - literal quoting and plain-identifier checks
//! - [`cte`] - `WITH name AS (...)` preludes

pub mod cte;
pub mod quote;

pub use cte::{with_prelude, Cte};
pub use quote::{is_plain_ident, quote_ident, quote_literal};

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    /// The SQL keyword for this direction.
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
