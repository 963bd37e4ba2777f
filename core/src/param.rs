//! Bound parameters and placeholder rendering.

use core::fmt::Write;
use std::borrow::Cow;

/// Marker for types usable as bound parameter values.
pub trait SQLParam: Clone + core::fmt::Debug + PartialEq {}

impl SQLParam for crate::value::Value<'_> {}

/// How parameter placeholders render in the final query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `?` for every parameter (SQLite, MySQL)
    #[default]
    Positional,
    /// `$1`, `$2`, ... (PostgreSQL)
    Numbered,
}

impl PlaceholderStyle {
    /// Renders the placeholder for the 1-based parameter `index`.
    pub(crate) fn render(self, index: usize, out: &mut String) {
        match self {
            PlaceholderStyle::Positional => out.push('?'),
            PlaceholderStyle::Numbered => {
                let _ = write!(out, "${index}");
            }
        }
    }
}

/// A parameter with its bound value.
#[derive(Debug, Clone)]
pub struct Param<'a, V: SQLParam> {
    pub value: Cow<'a, V>,
}

impl<'a, V: SQLParam> Param<'a, V> {
    #[inline]
    pub fn owned(value: V) -> Self {
        Self {
            value: Cow::Owned(value),
        }
    }

    #[inline]
    pub const fn borrowed(value: &'a V) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }
}
