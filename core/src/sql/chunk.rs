use std::borrow::Cow;

use crate::param::{Param, SQLParam};

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Raw` - unquoted SQL text (keywords, expressions, function names)
/// - `Ident` - quoted identifier for user-provided names
/// - `Param` - parameter placeholder with its bound value
#[derive(Debug, Clone)]
pub enum SQLChunk<'a, V: SQLParam> {
    /// Raw SQL text, rendered as-is
    Raw(Cow<'a, str>),
    /// Quoted identifier: renders as `"name"`
    Ident(Cow<'a, str>),
    /// Bound parameter: renders as `?` or `$n` depending on style
    Param(Param<'a, V>),
}

impl<'a, V: SQLParam> SQLChunk<'a, V> {
    /// Creates raw SQL text from a static string - const
    #[inline]
    pub const fn raw_static(text: &'static str) -> Self {
        Self::Raw(Cow::Borrowed(text))
    }

    /// Creates a quoted identifier from a static string - const
    #[inline]
    pub const fn ident_static(name: &'static str) -> Self {
        Self::Ident(Cow::Borrowed(name))
    }

    /// Creates raw SQL text from a runtime string
    #[inline]
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self::Raw(text.into())
    }

    /// Creates a quoted identifier from a runtime string
    #[inline]
    pub fn ident(name: impl Into<Cow<'a, str>>) -> Self {
        Self::Ident(name.into())
    }

    /// Creates a parameter chunk with an owned value
    #[inline]
    pub fn param(value: V) -> Self {
        Self::Param(Param::owned(value))
    }
}
