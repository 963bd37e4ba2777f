//! Result materialization: flat relational rows into nested object
//! graphs.
//!
//! A result set streams in through [`crate::row::RowStream`]. The column
//! index normalizes its column names once; for each destination type the
//! descriptor cache memoizes which fields bind to which columns and
//! which of them identify an instance. The materializer then walks every
//! row, deduplicating one-to-many repetition by group key and delegating
//! each cell to the scalar coercion layer.

mod coerce;
mod columns;
mod descriptor;
mod group_key;
mod materialize;

pub use coerce::{CoerceError, FromValue};
pub use columns::ColumnIndex;
pub use descriptor::{DescriptorCache, FieldBinding, FieldContext, TypeDescriptor};
pub use group_key::IdentityInfo;
pub use materialize::{Materializer, materialize_all, materialize_one};
