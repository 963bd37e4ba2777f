//! Memoized column bindings per destination type and nesting context.

use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::HashMap;

use super::columns::{ColumnIndex, normalized};
use super::group_key::{IdentityInfo, build_identity};
use crate::model::{FieldKind, FieldSpec, TypeShape};
use crate::value::ScalarKind;

/// Tag metadata of the parent field that referenced a type.
///
/// The same struct type produces independent descriptors when embedded
/// under different aliases, so the context participates in cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldContext {
    /// `#[model(column = "...")]` on the referencing field.
    pub alias: Option<&'static str>,
    /// `#[model(identity = "...")]` on the referencing field.
    pub identity_override: Option<&'static str>,
}

impl FieldContext {
    /// The context of a top-level destination.
    pub const ROOT: Self = Self {
        alias: None,
        identity_override: None,
    };

    pub fn of(field: &FieldSpec) -> Self {
        Self {
            alias: field.column,
            identity_override: field.identity_override,
        }
    }
}

/// Column bindings for one destination type in one nesting context,
/// parallel to the shape's field list.
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Canonical (normalized, post-alias) type name.
    pub type_name: String,
    pub fields: Vec<FieldBinding>,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldBinding {
    Scalar {
        column: Option<usize>,
        kind: ScalarKind,
    },
    Custom {
        column: Option<usize>,
    },
    One,
    MaybeOne,
    Many,
    ManyScalars {
        column: Option<usize>,
    },
    Skip,
}

// Shapes are interned statics; the address identifies the type. Const
// promotion may hand the same type several addresses across codegen
// units — entries are idempotent, so duplicates only cost a recompute.
type CacheKey = (usize, FieldContext, u64);

fn cache_key(shape: &'static TypeShape, context: FieldContext, columns: &ColumnIndex) -> CacheKey {
    (
        shape as *const TypeShape as usize,
        context,
        columns.fingerprint(),
    )
}

/// Process-wide memoization for descriptors and identity metadata.
///
/// Explicitly constructed and injectable — there is no package-level
/// singleton, so tests can run against independent caches. Concurrent
/// queries may share one instance: entries depend only on type shape and
/// column-set fingerprint and are idempotently recomputable, so a race
/// that computes the same entry twice resolves last-writer-wins.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descriptors: RwLock<HashMap<CacheKey, Arc<TypeDescriptor>>>,
    identities: RwLock<HashMap<CacheKey, Arc<IdentityInfo>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized descriptor for `shape` under `context`.
    pub fn describe(
        &self,
        shape: &'static TypeShape,
        context: FieldContext,
        columns: &ColumnIndex,
    ) -> Arc<TypeDescriptor> {
        let key = cache_key(shape, context, columns);
        if let Some(found) = self
            .descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return found.clone();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(type_name = shape.name, "computing type descriptor");

        let built = Arc::new(build_descriptor(shape, context, columns));
        self.descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, built.clone());
        built
    }

    /// The memoized identity metadata for `shape` under `context`.
    pub fn identity(
        &self,
        shape: &'static TypeShape,
        context: FieldContext,
        columns: &ColumnIndex,
    ) -> Arc<IdentityInfo> {
        let key = cache_key(shape, context, columns);
        if let Some(found) = self
            .identities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return found.clone();
        }

        let built = Arc::new(build_identity(self, shape, context, columns));
        self.identities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, built.clone());
        built
    }
}

/// The type name column lookups qualify with: the first dot-segment of
/// the referencing field's alias when present, else the declared name.
pub(crate) fn canonical_type_name(shape: &TypeShape, context: FieldContext) -> String {
    match context.alias {
        Some(alias) => normalized(alias.split('.').next().unwrap_or(alias)),
        None => normalized(shape.name),
    }
}

/// Column binding for a leaf field: owner-qualified lookup, honoring the
/// field's own alias (a dotted alias overrides the owner as well).
pub(crate) fn bind_column(
    columns: &ColumnIndex,
    owner: &str,
    field: &FieldSpec,
) -> Option<usize> {
    match field.column {
        Some(alias) => match alias.split_once('.') {
            Some((alias_owner, alias_field)) => columns.lookup(alias_owner, alias_field),
            None => columns.lookup(owner, alias),
        },
        None => columns.lookup(owner, field.name),
    }
}

fn build_descriptor(
    shape: &'static TypeShape,
    context: FieldContext,
    columns: &ColumnIndex,
) -> TypeDescriptor {
    let type_name = canonical_type_name(shape, context);
    let fields = shape
        .fields
        .iter()
        .map(|field| match field.kind {
            FieldKind::Scalar(kind) => FieldBinding::Scalar {
                column: bind_column(columns, &type_name, field),
                kind,
            },
            FieldKind::Custom => FieldBinding::Custom {
                column: bind_column(columns, &type_name, field),
            },
            FieldKind::One(_) => FieldBinding::One,
            FieldKind::MaybeOne(_) => FieldBinding::MaybeOne,
            FieldKind::Many(_) => FieldBinding::Many,
            FieldKind::ManyScalars(_) => FieldBinding::ManyScalars {
                column: bind_column(columns, &type_name, field),
            },
            FieldKind::Skip => FieldBinding::Skip,
        })
        .collect();
    TypeDescriptor { type_name, fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ScalarKind;

    static LEAF: TypeShape = TypeShape {
        name: "Leaf",
        fields: &[
            FieldSpec {
                name: "id",
                ty: "i64",
                column: None,
                identity: true,
                identity_override: None,
                kind: FieldKind::Scalar(ScalarKind::I64),
            },
            FieldSpec {
                name: "label",
                ty: "String",
                column: Some("title"),
                identity: false,
                identity_override: None,
                kind: FieldKind::Scalar(ScalarKind::Text),
            },
            FieldSpec {
                name: "source",
                ty: "String",
                column: Some("origin.name"),
                identity: false,
                identity_override: None,
                kind: FieldKind::Scalar(ScalarKind::Text),
            },
        ],
    };

    fn columns(names: &[&str]) -> ColumnIndex {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        ColumnIndex::new(&names)
    }

    #[test]
    fn binds_fields_through_aliases() {
        let cache = DescriptorCache::new();
        let cols = columns(&["leaf.id", "leaf.title", "origin.name"]);
        let descriptor = cache.describe(&LEAF, FieldContext::ROOT, &cols);

        assert_eq!(descriptor.type_name, "leaf");
        assert!(matches!(
            descriptor.fields[0],
            FieldBinding::Scalar { column: Some(0), .. }
        ));
        // field alias "title" replaces the declared name
        assert!(matches!(
            descriptor.fields[1],
            FieldBinding::Scalar { column: Some(1), .. }
        ));
        // dotted alias overrides the owner too
        assert!(matches!(
            descriptor.fields[2],
            FieldBinding::Scalar { column: Some(2), .. }
        ));
    }

    #[test]
    fn context_alias_renames_the_owner() {
        let cache = DescriptorCache::new();
        let cols = columns(&["writer.id"]);
        let context = FieldContext {
            alias: Some("Writer"),
            identity_override: None,
        };
        let descriptor = cache.describe(&LEAF, context, &cols);
        assert_eq!(descriptor.type_name, "writer");
        assert!(matches!(
            descriptor.fields[0],
            FieldBinding::Scalar { column: Some(0), .. }
        ));
    }

    #[test]
    fn unbound_fields_are_inert_not_errors() {
        let cache = DescriptorCache::new();
        let cols = columns(&["unrelated.thing"]);
        let descriptor = cache.describe(&LEAF, FieldContext::ROOT, &cols);
        assert!(matches!(
            descriptor.fields[0],
            FieldBinding::Scalar { column: None, .. }
        ));
    }

    #[test]
    fn descriptors_are_memoized_per_context() {
        let cache = DescriptorCache::new();
        let cols = columns(&["leaf.id"]);
        let a = cache.describe(&LEAF, FieldContext::ROOT, &cols);
        let b = cache.describe(&LEAF, FieldContext::ROOT, &cols);
        assert!(Arc::ptr_eq(&a, &b));

        let aliased = cache.describe(
            &LEAF,
            FieldContext {
                alias: Some("Writer"),
                identity_override: None,
            },
            &cols,
        );
        assert!(!Arc::ptr_eq(&a, &aliased));
    }
}
