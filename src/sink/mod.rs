// Append-only tabular sink: spreadsheets of named worksheets, each a header plus rows.

mod sqlite;

pub use sqlite::SqliteSink;

use std::future::Future;

use serde::{Deserialize, Serialize};

/// A typed cell. `Empty` is "no data" and is distinct from a measured zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl From<u32> for Cell {
    fn from(v: u32) -> Self {
        Cell::Int(v.into())
    }
}

impl From<u64> for Cell {
    fn from(v: u64) -> Self {
        Cell::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Destination for published rows. Rows are only ever appended; headers only grow.
pub trait TabularSink {
    /// Create `worksheet` with `header` unless it exists. Returns true when created.
    fn ensure_worksheet(
        &self,
        worksheet: &str,
        header: &[String],
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;

    fn read_header(
        &self,
        worksheet: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<String>>> + Send;

    /// Append `columns` to the end of the header. Existing columns are untouched.
    fn widen_header(
        &self,
        worksheet: &str,
        columns: &[String],
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Append rows in order; returns how many were written.
    fn append_rows(
        &self,
        worksheet: &str,
        rows: &[Vec<Cell>],
    ) -> impl Future<Output = anyhow::Result<u64>> + Send;
}
