//! Scalar coercion: opaque driver cells into statically-typed fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

use crate::value::{ScalarKind, Value};

/// Why a cell could not become the destination value.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// Source kind has no conversion into the destination kind
    #[error("cannot convert {from} into {to}")]
    Incompatible {
        from: &'static str,
        to: &'static str,
    },

    /// Numeric value does not fit the destination width or sign
    #[error("value {value} overflows {to}")]
    Overflow { value: i128, to: &'static str },

    /// Integer other than 0/1 offered to a bool destination
    #[error("integer {0} is not a bool (expected 0 or 1)")]
    InvalidBool(i128),

    /// Byte sequence offered to a text destination was not valid UTF-8
    #[error("byte sequence is not valid UTF-8")]
    Utf8,

    /// Text did not match any known timestamp encoding
    #[error("unrecognized timestamp text {0:?}")]
    BadTimestamp(String),

    /// Failure reported by a custom decode hook
    #[error("{0}")]
    Custom(String),
}

impl CoerceError {
    /// Wraps a custom decode failure message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

fn incompatible(value: &Value<'_>, to: &'static str) -> CoerceError {
    CoerceError::Incompatible {
        from: value.kind_name(),
        to,
    }
}

/// Converts a raw non-NULL cell into one destination primitive kind.
///
/// Narrowing is overflow-checked; unsigned destinations reject negative
/// sources outright rather than wrapping.
pub trait FromValue: Sized {
    const KIND: ScalarKind;

    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError>;
}

impl FromValue for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(0) | Value::UInt(0) => Ok(false),
            Value::Int(1) | Value::UInt(1) => Ok(true),
            Value::Int(i) => Err(CoerceError::InvalidBool(*i as i128)),
            Value::UInt(u) => Err(CoerceError::InvalidBool(*u as i128)),
            other => Err(incompatible(other, "bool")),
        }
    }
}

macro_rules! int_from_value {
    ($($t:ty => $kind:ident),+ $(,)?) => {$(
        impl FromValue for $t {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
                match value {
                    Value::Int(i) => <$t>::try_from(*i).map_err(|_| CoerceError::Overflow {
                        value: *i as i128,
                        to: stringify!($t),
                    }),
                    Value::UInt(u) => <$t>::try_from(*u).map_err(|_| CoerceError::Overflow {
                        value: *u as i128,
                        to: stringify!($t),
                    }),
                    other => Err(incompatible(other, stringify!($t))),
                }
            }
        }
    )+};
}

int_from_value! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
}

impl FromValue for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
        match value {
            Value::Float(f) => Ok(*f),
            other => Err(incompatible(other, "f64")),
        }
    }
}

impl FromValue for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    // float-to-float narrowing is silent, per IEEE-754 truncation
    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
        match value {
            Value::Float(f) => Ok(*f as f32),
            other => Err(incompatible(other, "f32")),
        }
    }
}

impl FromValue for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
        match value {
            Value::Text(t) => Ok(t.to_string()),
            Value::Bytes(b) => String::from_utf8(b.to_vec()).map_err(|_| CoerceError::Utf8),
            other => Err(incompatible(other, "string")),
        }
    }
}

impl FromValue for Vec<u8> {
    const KIND: ScalarKind = ScalarKind::Bytes;

    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
        match value {
            Value::Bytes(b) => Ok(b.to_vec()),
            Value::Text(t) => Ok(t.as_bytes().to_vec()),
            other => Err(incompatible(other, "bytes")),
        }
    }
}

impl FromValue for NaiveDateTime {
    const KIND: ScalarKind = ScalarKind::Timestamp;

    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
        match value {
            Value::Timestamp(t) => Ok(*t),
            Value::Text(t) => parse_timestamp(t),
            Value::Bytes(b) => match core::str::from_utf8(b) {
                Ok(s) => parse_timestamp(s),
                Err(_) => Err(CoerceError::Utf8),
            },
            other => Err(incompatible(other, "timestamp")),
        }
    }
}

impl FromValue for DateTime<Utc> {
    const KIND: ScalarKind = ScalarKind::Timestamp;

    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
        NaiveDateTime::from_value(value).map(|t| t.and_utc())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const KIND: ScalarKind = T::KIND;

    fn from_value(value: &Value<'_>) -> Result<Self, CoerceError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

/// Textual timestamp encodings drivers emit, most specific first. The
/// first format that parses the whole value wins.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub(crate) fn parse_timestamp(text: &str) -> Result<NaiveDateTime, CoerceError> {
    let text = text.trim();
    for format in TIMESTAMP_FORMATS {
        if format.contains("%:z") {
            if let Ok(t) = DateTime::parse_from_str(text, format) {
                return Ok(t.naive_utc());
            }
        } else if let Ok(t) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(t);
        }
    }
    // date-only values carry no time component at all
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(CoerceError::BadTimestamp(text.to_string()))
}
