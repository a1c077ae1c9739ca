//! Common Table Expressions.

/// A Common Table Expression: `name AS (body)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cte {
    pub name: String,
    pub body: String,
}

impl Cte {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// Render as `name AS (\n<body>\n)`.
    pub fn to_sql(&self) -> String {
        format!("{} AS (\n{}\n)", self.name, self.body.trim())
    }
}

/// Prefix `body` with a single `WITH` clause defining `ctes` in order.
///
/// Returns `body` unchanged when `ctes` is empty.
pub fn with_prelude(ctes: &[Cte], body: &str) -> String {
    let body = body.trim();
    if ctes.is_empty() {
        return body.to_string();
    }

    let defs: Vec<String> = ctes.iter().map(Cte::to_sql).collect();
    format!("WITH {}\n{}", defs.join(",\n"), body)
}
