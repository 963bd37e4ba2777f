//! Row interfaces consumed from the row-fetching collaborator.
//!
//! The materializer asks a [`RowStream`] for its column names once, then
//! pulls rows one at a time. `Row` is a lending associated type so driver
//! rows that borrow from a live statement (rusqlite) work unchanged.

// Driver-specific leaf implementations
#[cfg(feature = "rusqlite")]
mod rusqlite;

#[cfg(feature = "rusqlite")]
pub use rusqlite::SqliteRows;

use crate::value::Value;

/// One fetched row: ordered cells addressed by position.
pub trait SourceRow {
    /// The cell at `at`; out-of-range positions read as NULL.
    fn value_at(&self, at: usize) -> Value<'_>;
}

impl<R: SourceRow + ?Sized> SourceRow for &R {
    fn value_at(&self, at: usize) -> Value<'_> {
        (**self).value_at(at)
    }
}

impl SourceRow for [Value<'_>] {
    fn value_at(&self, at: usize) -> Value<'_> {
        self.get(at).map(Value::as_borrowed).unwrap_or(Value::Null)
    }
}

impl SourceRow for Vec<Value<'_>> {
    fn value_at(&self, at: usize) -> Value<'_> {
        self.as_slice().value_at(at)
    }
}

/// A streaming result set.
///
/// Rows are consumed in driver order, one at a time; the stream ends by
/// returning `None`. Cancellation of the underlying query is a driver
/// concern and is observed here only as "no more rows".
pub trait RowStream {
    type Row<'r>: SourceRow
    where
        Self: 'r;

    /// Column names, in projection order. Read once per result set.
    fn columns(&self) -> &[String];

    /// The next row, or `None` when the result set is exhausted.
    fn advance(&mut self) -> Option<Self::Row<'_>>;
}

/// An in-memory result set.
///
/// The row source for callers that already hold fetched rows, and the
/// fixture used throughout the test suite.
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    columns: Vec<String>,
    rows: Vec<Vec<Value<'static>>>,
    at: usize,
}

impl MemoryRows {
    pub fn new<C, N>(columns: C, rows: Vec<Vec<Value<'static>>>) -> Self
    where
        C: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
            at: 0,
        }
    }

    /// A result set holding exactly one row, for the one-row-in-hand
    /// materialization entry point.
    pub fn single<C, N>(columns: C, row: Vec<Value<'static>>) -> Self
    where
        C: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self::new(columns, vec![row])
    }
}

impl RowStream for MemoryRows {
    type Row<'r>
        = &'r [Value<'static>]
    where
        Self: 'r;

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Option<Self::Row<'_>> {
        let row = self.rows.get(self.at)?;
        self.at += 1;
        Some(row.as_slice())
    }
}
