//! Quoting for the values spliced into SQL text.

use regex::Regex;
use std::sync::LazyLock;

static PLAIN_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Quote string with single quotes (standard SQL).
///
/// Used for dataset paths and URLs, which DuckDB reads when they appear as
/// a string literal in a FROM clause or a `read_csv(...)` call.
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote identifier with double quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Whether `ident` can appear unquoted as a table name.
///
/// Logical table names are interpolated bare (`CREATE TABLE stations ...`,
/// `WITH stations AS ...`), so the registry only accepts names that pass
/// this check.
pub fn is_plain_ident(ident: &str) -> bool {
    PLAIN_IDENT.is_match(ident)
}
