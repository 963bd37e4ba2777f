//! Runtime half of trellis: type-safe SQL fragment construction and the
//! result materialization engine that assembles flat driver rows into
//! nested destination graphs.
//!
//! Destination types normally come from `#[derive(Model)]` in the
//! `trellis-macros` crate; everything here operates on the generated
//! [`model::TypeShape`] metadata and [`model::Record`] accessors only.

pub mod builder;
pub mod conversions;
pub mod error;
pub mod map;
pub mod model;
pub mod param;
pub mod row;
pub mod sql;
pub mod value;

// Re-export key types and traits
pub use builder::{OrderBy, QueryBuilder};
pub use conversions::ToSQL;
pub use error::{Result, TrellisError};
pub use map::{
    ColumnIndex, DescriptorCache, FromValue, Materializer, materialize_all, materialize_one,
};
pub use model::{FromCell, Model, Record};
pub use param::{Param, PlaceholderStyle, SQLParam};
pub use row::{MemoryRows, RowStream, SourceRow};
pub use sql::{SQL, SQLChunk};
pub use value::{ScalarKind, Value};
