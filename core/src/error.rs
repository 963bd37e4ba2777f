use thiserror::Error;

use crate::map::CoerceError;

#[derive(Debug, Error)]
pub enum TrellisError {
    /// A struct destination was requested but the result set had no rows
    #[error("no rows found")]
    NoRows,

    /// A scalar cell could not be converted to its destination field
    #[error("cannot coerce column value into `{field}: {ty}`: {source}")]
    Coerce {
        field: &'static str,
        ty: &'static str,
        #[source]
        source: CoerceError,
    },

    /// A custom decode hook rejected the cell value
    #[error("decoding `{field}: {ty}` failed: {source}")]
    Decode {
        field: &'static str,
        ty: &'static str,
        #[source]
        source: CoerceError,
    },

    /// Error constructing or serializing a query
    #[error("query error: {0}")]
    Query(String),
}

/// Result type for trellis operations
pub type Result<T> = core::result::Result<T, TrellisError>;
