//! Result tables.
//!
//! [`TableBuilder`] collects column names and rows, checks every row's
//! arity against the declared columns, and produces a [`ResultTable`] of
//! display strings. `build` consumes the builder, so one builder serves
//! exactly one report.

use std::fmt::Display;

use serde::Serialize;

use crate::error::{AnalyzerError, AnalyzerResult};

/// A finished, stringified report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    title: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at `row`, `column`, if present.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Every cell of `column`, top to bottom.
    pub fn column_values(&self, column: &str) -> Vec<&str> {
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => self.rows.iter().map(|r| r[idx].as_str()).collect(),
            None => Vec::new(),
        }
    }
}

/// Staged accumulator for a [`ResultTable`].
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until build() is called"]
pub struct TableBuilder {
    title: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a column. Duplicate names are allowed.
    pub fn declare_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.columns.push(name.into());
        self
    }

    /// Append several columns in order.
    pub fn declare_columns<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Replace the row set, stringifying every cell.
    ///
    /// If any row's length differs from the declared column count this
    /// fails with [`AnalyzerError::SchemaMismatch`] and the builder holds no
    /// rows afterwards.
    pub fn set_rows<R, C>(&mut self, rows: &[R]) -> AnalyzerResult<&mut Self>
    where
        R: AsRef<[C]>,
        C: Display,
    {
        self.rows.clear();

        let expected = self.columns.len();
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != expected) {
            return Err(AnalyzerError::SchemaMismatch {
                got: bad.as_ref().len(),
                expected,
            });
        }

        self.rows = rows
            .iter()
            .map(|r| r.as_ref().iter().map(|c| c.to_string()).collect())
            .collect();
        Ok(self)
    }

    /// Finish the table.
    ///
    /// Columns declared after `set_rows` are re-checked here.
    pub fn build(self) -> AnalyzerResult<ResultTable> {
        let expected = self.columns.len();
        if let Some(bad) = self.rows.iter().find(|r| r.len() != expected) {
            return Err(AnalyzerError::SchemaMismatch {
                got: bad.len(),
                expected,
            });
        }

        Ok(ResultTable {
            title: self.title,
            columns: self.columns,
            rows: self.rows,
        })
    }
}
