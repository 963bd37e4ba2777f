//! Group keys: recognizing which rows continue an existing object.

use core::fmt::Write;
use std::sync::Arc;

use super::columns::{ColumnIndex, normalized};
use super::descriptor::{DescriptorCache, FieldContext, bind_column, canonical_type_name};
use crate::model::{FieldKind, TypeShape};
use crate::row::SourceRow;

/// Which bound columns identify one logical instance of a type, plus the
/// contributions of its nested struct fields.
#[derive(Debug, Default)]
pub struct IdentityInfo {
    pub(crate) type_name: String,
    pub(crate) columns: Vec<usize>,
    pub(crate) nested: Vec<Arc<IdentityInfo>>,
}

impl IdentityInfo {
    /// No identity at any level: every row yields a new instance.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.nested.iter().all(|n| n.is_empty())
    }
}

/// Selects identity columns for `shape` under `context`.
///
/// The referencing field's `identity = "A,B"` override, when present,
/// replaces the type's intrinsic `#[model(id)]` markers. Fields that
/// resolve to no column are excluded. Nested struct fields (not
/// collections) append their own contributions; branches with neither
/// own nor nested identity are skipped.
pub(crate) fn build_identity(
    cache: &DescriptorCache,
    shape: &'static TypeShape,
    context: FieldContext,
    columns: &ColumnIndex,
) -> IdentityInfo {
    let type_name = canonical_type_name(shape, context);

    let override_names: Option<Vec<String>> = context
        .identity_override
        .map(|list| list.split(',').map(|name| normalized(name.trim())).collect());

    let mut identity_columns = Vec::new();
    for field in shape.fields {
        let leaf = matches!(
            field.kind,
            FieldKind::Scalar(_) | FieldKind::Custom
        );
        if !leaf {
            continue;
        }
        let chosen = match &override_names {
            Some(names) => names.contains(&normalized(field.name)),
            None => field.identity,
        };
        if !chosen {
            continue;
        }
        if let Some(column) = bind_column(columns, &type_name, field) {
            identity_columns.push(column);
        }
    }

    let mut nested = Vec::new();
    for field in shape.fields {
        if let FieldKind::One(child) | FieldKind::MaybeOne(child) = field.kind {
            let info = cache.identity(child, FieldContext::of(field), columns);
            if !info.is_empty() {
                nested.push(info);
            }
        }
    }

    IdentityInfo {
        type_name,
        columns: identity_columns,
        nested,
    }
}

/// Renders the composite key for the current row into `out`.
///
/// Identity-less types fall back to the row ordinal, so no two rows ever
/// collide and such types are never deduplicated.
pub(crate) fn build_key(
    info: &IdentityInfo,
    row: &dyn SourceRow,
    ordinal: usize,
    out: &mut String,
) {
    if info.is_empty() {
        let _ = write!(out, "#{ordinal}");
        return;
    }
    out.push_str(&info.type_name);
    out.push(':');
    for (at, &column) in info.columns.iter().enumerate() {
        if at > 0 {
            out.push('|');
        }
        row.value_at(column).group_token(out);
    }
    for nested in &info.nested {
        out.push('(');
        build_key(nested, row, ordinal, out);
        out.push(')');
    }
}
