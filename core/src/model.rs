//! Static destination-type descriptors and their erased runtime accessors.
//!
//! The materializer never inspects concrete types. `#[derive(Model)]`
//! compiles a struct's layout down to a [`TypeShape`] — one [`FieldSpec`]
//! per declared field — and a [`Record`] impl that dispatches field
//! assignment and nested access by field position. The engine walks shapes
//! and trait objects only, so one compiled walker serves every destination
//! graph.

use crate::error::TrellisError;
use crate::map::{CoerceError, FromValue};
use crate::value::{ScalarKind, Value};

/// Static shape of one destination struct type.
#[derive(Debug)]
pub struct TypeShape {
    /// Declared type name; canonicalized (lowercased, punctuation
    /// stripped) before column lookup.
    pub name: &'static str,
    /// One spec per declared field, in declaration order.
    pub fields: &'static [FieldSpec],
}

/// Static metadata for one declared field.
#[derive(Debug)]
pub struct FieldSpec {
    /// Declared field name.
    pub name: &'static str,
    /// Declared Rust type, for error messages.
    pub ty: &'static str,
    /// `#[model(column = "...")]` alias override.
    pub column: Option<&'static str>,
    /// `#[model(id)]` intrinsic identity marker.
    pub identity: bool,
    /// `#[model(identity = "A,B")]` override list for the referenced type.
    pub identity_override: Option<&'static str>,
    pub kind: FieldKind,
}

/// How a field participates in materialization.
#[derive(Debug)]
pub enum FieldKind {
    /// Leaf primitive bound to a result column
    Scalar(ScalarKind),
    /// Decoded through the field type's [`FromCell`] impl
    Custom,
    /// Nested struct, always present
    One(&'static TypeShape),
    /// Optional nested struct (`Option<T>`)
    MaybeOne(&'static TypeShape),
    /// Nested collection of structs (`Vec<T>`)
    Many(&'static TypeShape),
    /// Nested collection of scalars (`Vec<i64>`, `Vec<String>`, ...)
    ManyScalars(ScalarKind),
    /// `#[model(skip)]` — never read from rows
    Skip,
}

/// A destination type with a derive-generated shape.
pub trait Model: Default + Sized + 'static {
    const SHAPE: &'static TypeShape;
}

/// Object-safe runtime access to one destination instance.
///
/// Generated by `#[derive(Model)]`; the materializer only ever sees
/// `&mut dyn Record`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be materialized from result rows",
    label = "this type does not implement Record",
    note = "add #[derive(Model)] to the destination struct"
)]
pub trait Record {
    fn shape(&self) -> &'static TypeShape;

    /// Assigns a non-NULL cell to the scalar or custom field at `field`.
    fn assign(&mut self, field: usize, value: &Value<'_>) -> Result<(), CoerceError>;

    /// Mutable access to the complex field at `field`.
    fn nested_mut(&mut self, field: usize) -> Option<NestedMut<'_>>;
}

/// Erased handle onto one complex field.
pub enum NestedMut<'a> {
    One(&'a mut dyn Record),
    MaybeOne(&'a mut dyn OptionalRecord),
    Many(&'a mut dyn RecordList),
    ManyScalars(&'a mut dyn ScalarList),
}

/// An optional nested struct (`Option<T>`).
pub trait OptionalRecord {
    fn shape(&self) -> &'static TypeShape;

    /// Runs `fill` against the contained record, materializing a default
    /// instance when absent. A fresh instance is committed only when
    /// `fill` reports progress, so an all-NULL branch stays `None`.
    fn populate(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Record) -> Result<bool, TrellisError>,
    ) -> Result<bool, TrellisError>;
}

impl<T: Model + Record> OptionalRecord for Option<T> {
    fn shape(&self) -> &'static TypeShape {
        T::SHAPE
    }

    fn populate(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Record) -> Result<bool, TrellisError>,
    ) -> Result<bool, TrellisError> {
        match self {
            Some(existing) => fill(existing),
            None => {
                let mut fresh = T::default();
                let changed = fill(&mut fresh)?;
                if changed {
                    *self = Some(fresh);
                }
                Ok(changed)
            }
        }
    }
}

/// A growable collection of nested struct instances (`Vec<T>`).
pub trait RecordList {
    fn shape(&self) -> &'static TypeShape;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a default instance and returns its position.
    fn push_default(&mut self) -> usize;

    fn record_at(&mut self, at: usize) -> &mut dyn Record;

    /// Drops the most recently appended instance.
    fn pop(&mut self);
}

impl<T: Model + Record> RecordList for Vec<T> {
    fn shape(&self) -> &'static TypeShape {
        T::SHAPE
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push_default(&mut self) -> usize {
        self.push(T::default());
        Vec::len(self) - 1
    }

    fn record_at(&mut self, at: usize) -> &mut dyn Record {
        &mut self[at]
    }

    fn pop(&mut self) {
        Vec::pop(self);
    }
}

/// A growable collection of scalar values (`Vec<i64>`, `Vec<String>`, ...).
pub trait ScalarList {
    /// Coerces and appends one non-NULL cell.
    fn push_value(&mut self, value: &Value<'_>) -> Result<(), CoerceError>;
}

impl<T: FromValue> ScalarList for Vec<T> {
    fn push_value(&mut self, value: &Value<'_>) -> Result<(), CoerceError> {
        self.push(T::from_value(value)?);
        Ok(())
    }
}

/// Custom decode capability.
///
/// A field marked `#[model(custom)]` is handed the raw cell value through
/// this trait, pre-empting the default scalar coercion. Implement it for
/// wrapper types whose column encoding is not one of the primitive kinds.
///
/// ```
/// use trellis_core::{FromCell, Value, map::CoerceError};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Tags(Vec<String>);
///
/// impl FromCell for Tags {
///     fn from_cell(value: &Value<'_>) -> Result<Self, CoerceError> {
///         match value {
///             Value::Text(t) => Ok(Tags(t.split(',').map(str::to_string).collect())),
///             other => Err(CoerceError::custom(format!(
///                 "expected text, got {}",
///                 other.kind_name()
///             ))),
///         }
///     }
/// }
/// ```
pub trait FromCell: Sized {
    fn from_cell(value: &Value<'_>) -> Result<Self, CoerceError>;
}
