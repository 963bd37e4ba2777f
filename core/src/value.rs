//! The cell value model shared by query parameters and result rows.

use core::fmt::{self, Display, Write};
use std::borrow::Cow;

use chrono::NaiveDateTime;

/// A single cell of a result row, or a bound query parameter.
///
/// Cells are either NULL or carry one value from a small closed set of
/// primitive kinds. Text and byte payloads borrow from the driver buffer
/// where possible (`Cow`), so per-cell reads stay allocation-free.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value<'a> {
    /// SQL NULL
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer of any width, widened to i64
    Int(i64),
    /// Unsigned integer of any width, widened to u64
    UInt(u64),
    /// Floating-point value of either width, widened to f64
    Float(f64),
    /// Text value (borrowed or owned string)
    Text(Cow<'a, str>),
    /// Byte sequence (borrowed or owned)
    Bytes(Cow<'a, [u8]>),
    /// Driver-native timestamp
    Timestamp(NaiveDateTime),
}

impl<'a> Value<'a> {
    /// Whether this cell is SQL NULL.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Cheap reborrowing view; owned payloads are not cloned.
    pub fn as_borrowed(&self) -> Value<'_> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::UInt(u) => Value::UInt(*u),
            Value::Float(f) => Value::Float(*f),
            Value::Text(t) => Value::Text(Cow::Borrowed(t)),
            Value::Bytes(b) => Value::Bytes(Cow::Borrowed(b)),
            Value::Timestamp(t) => Value::Timestamp(*t),
        }
    }

    /// Converts this value to one with `'static` payloads.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Int(i) => Value::Int(i),
            Value::UInt(u) => Value::UInt(u),
            Value::Float(f) => Value::Float(f),
            Value::Text(t) => Value::Text(Cow::Owned(t.into_owned())),
            Value::Bytes(b) => Value::Bytes(Cow::Owned(b.into_owned())),
            Value::Timestamp(t) => Value::Timestamp(t),
        }
    }

    /// Source kind name used in coercion error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// Renders this cell into a group-key token.
    ///
    /// Tokens are kind-qualified so `1` and `"1"` never produce the same
    /// key piece. Floats render by bit pattern to stay stable across
    /// formatting changes.
    pub(crate) fn group_token(&self, out: &mut String) {
        match self {
            Value::Null => out.push('~'),
            Value::Bool(b) => {
                out.push_str(if *b { "o:1" } else { "o:0" });
            }
            Value::Int(i) => {
                let _ = write!(out, "i:{i}");
            }
            Value::UInt(u) => {
                let _ = write!(out, "u:{u}");
            }
            Value::Float(f) => {
                let _ = write!(out, "f:{:016x}", f.to_bits());
            }
            Value::Text(t) => {
                out.push_str("s:");
                out.push_str(t);
            }
            Value::Bytes(b) => {
                out.push_str("y:");
                for byte in b.iter() {
                    let _ = write!(out, "{byte:02x}");
                }
            }
            Value::Timestamp(t) => {
                let _ = write!(out, "t:{t}");
            }
        }
    }
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(t) => write!(f, "{t}"),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Value::Timestamp(t) => write!(f, "{t}"),
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value<'_> {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value<'_> {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value<'_> {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Text(Cow::Borrowed(value))
    }
}

impl From<String> for Value<'_> {
    fn from(value: String) -> Self {
        Value::Text(Cow::Owned(value))
    }
}

impl From<Vec<u8>> for Value<'_> {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(value))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(value: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(value))
    }
}

impl From<NaiveDateTime> for Value<'_> {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Destination primitive kinds a scalar field can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Text,
    Bytes,
    Timestamp,
}

impl ScalarKind {
    /// Destination kind name used in coercion error messages.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Text => "text",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Timestamp => "timestamp",
        }
    }
}
