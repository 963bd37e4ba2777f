//! # Trellis
//!
//! A type-safe SQL construction library with a result materialization
//! engine: flat driver rows become arbitrarily nested object graphs, with
//! identity-based deduplication when one-to-many joins repeat parent rows.
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! #[derive(Debug, Default, PartialEq, Model)]
//! struct Author {
//!     #[model(id)]
//!     id: i64,
//!     name: String,
//!     posts: Vec<Post>,
//! }
//!
//! #[derive(Debug, Default, PartialEq, Model)]
//! struct Post {
//!     #[model(id)]
//!     id: i64,
//!     title: String,
//! }
//!
//! # fn main() -> trellis::Result<()> {
//! // Rows as a driver would produce them for
//! // `SELECT ... AS "author.id", ... AS "post.title" ... LEFT JOIN ...`
//! let rows = MemoryRows::new(
//!     ["author.id", "author.name", "post.id", "post.title"],
//!     vec![
//!         vec![Value::Int(1), Value::from("ada"), Value::Int(10), Value::from("On Engines")],
//!         vec![Value::Int(1), Value::from("ada"), Value::Int(11), Value::from("Notes")],
//!         vec![Value::Int(2), Value::from("brian"), Value::Null, Value::Null],
//!     ],
//! );
//!
//! let mut authors: Vec<Author> = Vec::new();
//! materialize_all(rows, &mut authors)?;
//!
//! assert_eq!(authors.len(), 2);
//! assert_eq!(authors[0].posts.len(), 2);
//! assert!(authors[1].posts.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Column names follow the `Owner.Field` convention (case- and
//! punctuation-insensitive); [`QueryBuilder`] emits matching aliases.
//! Destination fields that resolve to no column are simply inert, so
//! partial projections need no configuration.

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for trellis operations
pub use trellis_core::error::Result;

/// Derive macro generating `Model` + `Record` for destination structs
pub use trellis_macros::Model;

/// Error types
pub mod error {
    pub use trellis_core::error::TrellisError;
    pub use trellis_core::map::CoerceError;
}

pub use trellis_core::builder::{OrderBy, QueryBuilder};
pub use trellis_core::map::{
    ColumnIndex, DescriptorCache, Materializer, materialize_all, materialize_one,
};
pub use trellis_core::param::{PlaceholderStyle, SQLParam};
pub use trellis_core::row::{MemoryRows, RowStream, SourceRow};
pub use trellis_core::sql::{SQL, SQLChunk};
pub use trellis_core::value::{ScalarKind, Value};
pub use trellis_core::{FromCell, FromValue, Record, ToSQL};

#[cfg(feature = "rusqlite")]
pub use trellis_core::row::SqliteRows;

/// Convenience re-exports for the common case.
pub mod prelude {
    pub use crate::error::{CoerceError, TrellisError};
    pub use trellis_core::builder::{OrderBy, QueryBuilder};
    pub use trellis_core::error::Result;
    pub use trellis_core::map::{DescriptorCache, Materializer, materialize_all, materialize_one};
    pub use trellis_core::model::{FromCell, Model, Record};
    pub use trellis_core::param::PlaceholderStyle;
    pub use trellis_core::row::{MemoryRows, RowStream, SourceRow};
    pub use trellis_core::sql::SQL;
    pub use trellis_core::value::Value;
    // the derive shares the trait's name; they live in different namespaces
    pub use trellis_macros::Model;

    #[cfg(feature = "rusqlite")]
    pub use trellis_core::row::SqliteRows;
}
