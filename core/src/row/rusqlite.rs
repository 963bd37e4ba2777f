//! rusqlite driver adapter.

use std::borrow::Cow;

use rusqlite::types::ValueRef;

use super::{RowStream, SourceRow};
use crate::value::Value;

impl SourceRow for rusqlite::Row<'_> {
    fn value_at(&self, at: usize) -> Value<'_> {
        match self.get_ref(at) {
            Ok(ValueRef::Integer(i)) => Value::Int(i),
            Ok(ValueRef::Real(f)) => Value::Float(f),
            Ok(ValueRef::Text(t)) => match core::str::from_utf8(t) {
                Ok(s) => Value::Text(Cow::Borrowed(s)),
                Err(_) => Value::Bytes(Cow::Borrowed(t)),
            },
            Ok(ValueRef::Blob(b)) => Value::Bytes(Cow::Borrowed(b)),
            Ok(ValueRef::Null) | Err(_) => Value::Null,
        }
    }
}

/// A rusqlite result set.
///
/// ```no_run
/// # fn main() -> rusqlite::Result<()> {
/// use trellis_core::row::SqliteRows;
///
/// let conn = rusqlite::Connection::open_in_memory()?;
/// let mut stmt = conn.prepare(r#"SELECT id AS "author.id" FROM authors"#)?;
/// let rows = SqliteRows::query(&mut stmt, [])?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
pub struct SqliteRows<'stmt> {
    columns: Vec<String>,
    rows: rusqlite::Rows<'stmt>,
}

impl<'stmt> SqliteRows<'stmt> {
    /// Executes `stmt` and wraps the resulting rows.
    pub fn query(
        stmt: &'stmt mut rusqlite::Statement<'_>,
        params: impl rusqlite::Params,
    ) -> rusqlite::Result<Self> {
        let columns = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let rows = stmt.query(params)?;
        Ok(Self { columns, rows })
    }
}

impl<'stmt> RowStream for SqliteRows<'stmt> {
    type Row<'r>
        = &'r rusqlite::Row<'stmt>
    where
        Self: 'r;

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Option<Self::Row<'_>> {
        // A driver error mid-stream ends the result set.
        self.rows.next().ok().flatten()
    }
}
