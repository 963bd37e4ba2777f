mod chunk;

pub use chunk::SQLChunk;
use smallvec::SmallVec;
use std::borrow::Cow;

use crate::param::{PlaceholderStyle, SQLParam};

/// SQL fragment builder with flat chunk storage.
///
/// Uses `SmallVec<[SQLChunk; 8]>` for inline storage of typical SQL
/// fragments without heap allocation.
#[derive(Debug, Clone)]
pub struct SQL<'a, V: SQLParam> {
    pub chunks: SmallVec<[SQLChunk<'a, V>; 8]>,
}

impl<'a, V: SQLParam> SQL<'a, V> {
    // ==================== constructors ====================

    /// Creates an empty SQL fragment
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates SQL with raw text (unquoted)
    #[inline]
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Raw(text.into())],
        }
    }

    /// Creates SQL with a quoted identifier
    #[inline]
    pub fn ident(name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Ident(name.into())],
        }
    }

    /// Creates SQL with a single parameter value
    #[inline]
    pub fn param(value: V) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::param(value)],
        }
    }

    // ==================== builder methods ====================

    /// Append another SQL fragment (flat extend)
    #[inline]
    pub fn append(mut self, other: impl Into<SQL<'a, V>>) -> Self {
        let other = other.into();

        if self.chunks.is_empty() {
            return other;
        }
        if other.chunks.is_empty() {
            return self;
        }

        self.chunks.extend(other.chunks);
        self
    }

    #[inline]
    pub fn append_mut(&mut self, other: impl Into<SQL<'a, V>>) {
        let other = other.into();

        if self.chunks.is_empty() {
            self.chunks = other.chunks;
            return;
        }

        self.chunks.extend(other.chunks);
    }

    /// Push a single chunk
    #[inline]
    pub fn push(mut self, chunk: impl Into<SQLChunk<'a, V>>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    /// Joins fragments with a separator
    pub fn join(parts: impl IntoIterator<Item = SQL<'a, V>>, separator: &'static str) -> Self {
        let mut out = Self::empty();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out.chunks.push(SQLChunk::raw_static(separator));
            }
            out.append_mut(part);
        }
        out
    }

    /// Wraps this fragment in parentheses
    pub fn parens(self) -> Self {
        let mut out = Self::empty();
        out.chunks.push(SQLChunk::raw_static("("));
        out.append_mut(self);
        out.chunks.push(SQLChunk::raw_static(")"));
        out
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ==================== serialization ====================

    /// Renders the fragment to query text plus positional arguments.
    pub fn build(&self, style: PlaceholderStyle) -> (String, Vec<V>) {
        let mut text = String::new();
        let mut params = Vec::new();

        for chunk in &self.chunks {
            let mut piece = String::new();
            match chunk {
                SQLChunk::Raw(raw) => piece.push_str(raw),
                SQLChunk::Ident(name) => {
                    piece.push('"');
                    piece.push_str(&name.replace('"', "\"\""));
                    piece.push('"');
                }
                SQLChunk::Param(param) => {
                    params.push(param.value.clone().into_owned());
                    style.render(params.len(), &mut piece);
                }
            }
            push_spaced(&mut text, &piece);
        }

        (text, params)
    }
}

impl<'a, V: SQLParam> Default for SQL<'a, V> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Appends `piece`, inserting a space unless the boundary is punctuation
/// that reads better unspaced (open paren before, comma/close paren after).
fn push_spaced(out: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    let after_open = out.ends_with('(') || out.ends_with(' ');
    let closes = piece.starts_with(')') || piece.starts_with(',') || piece.starts_with('.');
    if !out.is_empty() && !after_open && !closes {
        out.push(' ');
    }
    out.push_str(piece);
}
