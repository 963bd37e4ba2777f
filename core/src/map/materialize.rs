//! The recursive row-to-graph walk.
//!
//! One row at a time: compute the element's group key, either merge the
//! row into the already-materialized instance (recursing into nested
//! fields only) or allocate a fresh instance and populate it in full.
//! Identity maps live for one call and are never shared across queries.

use std::sync::Arc;

use hashbrown::HashMap;

use super::columns::ColumnIndex;
use super::descriptor::{DescriptorCache, FieldBinding, FieldContext};
use super::group_key::build_key;
use crate::error::{Result, TrellisError};
#[allow(unused_imports)]
use crate::model::{FieldSpec, Model, NestedMut, OptionalRecord, Record, RecordList, ScalarList};
use crate::row::{RowStream, SourceRow};

/// Drives result rows into nested destination graphs.
///
/// Holds only the descriptor cache; all per-call state is private to one
/// materialization, so a single materializer may serve concurrent
/// queries.
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    cache: Arc<DescriptorCache>,
}

impl Materializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares an existing descriptor cache.
    pub fn with_cache(cache: Arc<DescriptorCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<DescriptorCache> {
        &self.cache
    }

    /// Materializes every row of `rows` into `out`, deduplicating
    /// elements by identity.
    ///
    /// Returns the number of rows that bound at least one cell; a result
    /// set with no columns bound to the destination reports 0 without
    /// error.
    pub fn materialize_all<S, T>(&self, mut rows: S, out: &mut Vec<T>) -> Result<usize>
    where
        S: RowStream,
        T: Model + Record,
    {
        let columns = ColumnIndex::new(rows.columns());
        let mut session = Session::new(&self.cache, columns);
        let mut consumed = 0;
        while let Some(row) = rows.advance() {
            if session.row_into_list(&row, out, FieldContext::ROOT, "")? {
                consumed += 1;
            }
            session.ordinal += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            rows = session.ordinal,
            consumed,
            instances = out.len(),
            "materialized collection"
        );

        Ok(consumed)
    }

    /// Materializes a struct destination from a whole result set.
    ///
    /// Reports [`TrellisError::NoRows`] on an empty result set. A
    /// non-empty result set whose cells are all NULL still yields a
    /// present-but-empty value. When rows carry more than one group key,
    /// the first-seen object wins and only rows sharing its key merge
    /// into it.
    pub fn materialize_one<S, T>(&self, mut rows: S, out: &mut T) -> Result<()>
    where
        S: RowStream,
        T: Model + Record,
    {
        // Length-1 synthetic collection, unwrapped below.
        let mut staged: Vec<T> = Vec::with_capacity(1);
        let columns = ColumnIndex::new(rows.columns());
        let mut session = Session::new(&self.cache, columns);
        let mut rows_seen = 0usize;
        while let Some(row) = rows.advance() {
            session.row_into_list(&row, &mut staged, FieldContext::ROOT, "")?;
            session.ordinal += 1;
            rows_seen += 1;
        }
        if rows_seen == 0 {
            return Err(TrellisError::NoRows);
        }
        *out = staged.into_iter().next().unwrap_or_default();
        Ok(())
    }
}

/// One-shot [`Materializer::materialize_all`] with a private cache.
pub fn materialize_all<S, T>(rows: S, out: &mut Vec<T>) -> Result<usize>
where
    S: RowStream,
    T: Model + Record,
{
    Materializer::new().materialize_all(rows, out)
}

/// One-shot [`Materializer::materialize_one`] with a private cache.
pub fn materialize_one<S, T>(rows: S, out: &mut T) -> Result<()>
where
    S: RowStream,
    T: Model + Record,
{
    Materializer::new().materialize_one(rows, out)
}

/// Whether a populate pass may assign scalar and custom fields.
///
/// Rows that continue an existing instance re-enter it for nested fields
/// only; re-assigning scalars would be redundant and would defeat the
/// phantom-object guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Full,
    NestedOnly,
}

/// Per-call state: the column index, the identity map, the row ordinal.
struct Session<'run> {
    cache: &'run DescriptorCache,
    columns: ColumnIndex,
    /// group key -> position, scoped per collection by the key's nesting
    /// prefix (each descent extends the prefix with the field name).
    seen: HashMap<String, usize>,
    ordinal: usize,
}

impl<'run> Session<'run> {
    fn new(cache: &'run DescriptorCache, columns: ColumnIndex) -> Self {
        Self {
            cache,
            columns,
            seen: HashMap::new(),
            ordinal: 0,
        }
    }

    /// Maps the current row into one struct-element collection.
    fn row_into_list(
        &mut self,
        row: &dyn SourceRow,
        list: &mut dyn RecordList,
        context: FieldContext,
        prefix: &str,
    ) -> Result<bool> {
        let shape = list.shape();
        let identity = self.cache.identity(shape, context, &self.columns);

        let mut key = String::with_capacity(prefix.len() + 24);
        key.push_str(prefix);
        key.push(',');
        build_key(&identity, row, self.ordinal, &mut key);

        if let Some(&at) = self.seen.get(&key) {
            // Row continues an existing element: merge nested children.
            let record = list.record_at(at);
            self.populate(row, record, context, &key, Pass::NestedOnly)
        } else {
            let at = list.push_default();
            let changed = match self.populate(row, list.record_at(at), context, &key, Pass::Full) {
                Ok(changed) => changed,
                Err(e) => {
                    // the failed row must not leave a half-built element
                    list.pop();
                    return Err(e);
                }
            };
            if changed {
                self.seen.insert(key, at);
            } else {
                // Nothing bound for this branch on this row; an all-NULL
                // optional branch must not leave a phantom element.
                list.pop();
            }
            Ok(changed)
        }
    }

    /// Populates the fields of one instance from the current row.
    fn populate(
        &mut self,
        row: &dyn SourceRow,
        record: &mut dyn Record,
        context: FieldContext,
        key: &str,
        pass: Pass,
    ) -> Result<bool> {
        let shape = record.shape();
        let descriptor = self.cache.describe(shape, context, &self.columns);
        let mut changed = false;

        for (at, binding) in descriptor.fields.iter().enumerate() {
            let spec = &shape.fields[at];
            match *binding {
                FieldBinding::Scalar {
                    column: Some(column),
                    ..
                } if pass == Pass::Full => {
                    let cell = row.value_at(column);
                    if !cell.is_null() {
                        record
                            .assign(at, &cell)
                            .map_err(|source| TrellisError::Coerce {
                                field: spec.name,
                                ty: spec.ty,
                                source,
                            })?;
                        changed = true;
                    }
                }
                FieldBinding::Custom {
                    column: Some(column),
                } if pass == Pass::Full => {
                    let cell = row.value_at(column);
                    if !cell.is_null() {
                        record
                            .assign(at, &cell)
                            .map_err(|source| TrellisError::Decode {
                                field: spec.name,
                                ty: spec.ty,
                                source,
                            })?;
                        changed = true;
                    }
                }
                FieldBinding::One
                | FieldBinding::MaybeOne
                | FieldBinding::Many
                | FieldBinding::ManyScalars { .. } => {
                    changed |= self.nested_field(row, record, at, *binding, spec, key, pass)?;
                }
                _ => {}
            }
        }

        Ok(changed)
    }

    /// Recurses into one complex field.
    fn nested_field(
        &mut self,
        row: &dyn SourceRow,
        record: &mut dyn Record,
        at: usize,
        binding: FieldBinding,
        spec: &FieldSpec,
        key: &str,
        pass: Pass,
    ) -> Result<bool> {
        let Some(nested) = record.nested_mut(at) else {
            return Ok(false);
        };
        let context = FieldContext::of(spec);
        // Scope child identity maps by field name so sibling fields of
        // the same type never share keys.
        let prefix = format!("{key}/{}", spec.name);

        match (nested, binding) {
            (NestedMut::Many(list), _) => self.row_into_list(row, list, context, &prefix),
            (NestedMut::ManyScalars(list), FieldBinding::ManyScalars { column: Some(column) }) => {
                let cell = row.value_at(column);
                if cell.is_null() {
                    Ok(false)
                } else {
                    list.push_value(&cell)
                        .map_err(|source| TrellisError::Coerce {
                            field: spec.name,
                            ty: spec.ty,
                            source,
                        })?;
                    Ok(true)
                }
            }
            // an unbound scalar collection is inert for this query
            (NestedMut::ManyScalars(_), _) => Ok(false),
            (NestedMut::One(child), _) => self.populate(row, child, context, &prefix, pass),
            (NestedMut::MaybeOne(optional), _) => {
                optional.populate(&mut |child| self.populate(row, child, context, &prefix, pass))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{CoerceError, FromValue};
    use crate::model::{FieldKind, TypeShape};
    use crate::row::MemoryRows;
    use crate::value::{ScalarKind, Value};

    // Hand-written shapes and accessors; the derive produces the same.

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Child {
        id: i64,
    }

    static CHILD: TypeShape = TypeShape {
        name: "Child",
        fields: &[FieldSpec {
            name: "id",
            ty: "i64",
            column: None,
            identity: true,
            identity_override: None,
            kind: FieldKind::Scalar(ScalarKind::I64),
        }],
    };

    impl Model for Child {
        const SHAPE: &'static TypeShape = &CHILD;
    }

    impl Record for Child {
        fn shape(&self) -> &'static TypeShape {
            &CHILD
        }

        fn assign(&mut self, field: usize, value: &Value<'_>) -> std::result::Result<(), CoerceError> {
            match field {
                0 => {
                    self.id = FromValue::from_value(value)?;
                    Ok(())
                }
                _ => Err(CoerceError::custom("no such scalar field")),
            }
        }

        fn nested_mut(&mut self, _field: usize) -> Option<NestedMut<'_>> {
            None
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Parent {
        id: i64,
        children: Vec<Child>,
    }

    static PARENT: TypeShape = TypeShape {
        name: "Parent",
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
                name: "children",
                ty: "Vec<Child>",
                column: None,
                identity: false,
                identity_override: None,
                kind: FieldKind::Many(&CHILD),
            },
        ],
    };

    impl Model for Parent {
        const SHAPE: &'static TypeShape = &PARENT;
    }

    impl Record for Parent {
        fn shape(&self) -> &'static TypeShape {
            &PARENT
        }

        fn assign(&mut self, field: usize, value: &Value<'_>) -> std::result::Result<(), CoerceError> {
            match field {
                0 => {
                    self.id = FromValue::from_value(value)?;
                    Ok(())
                }
                _ => Err(CoerceError::custom("no such scalar field")),
            }
        }

        fn nested_mut(&mut self, field: usize) -> Option<NestedMut<'_>> {
            match field {
                1 => Some(NestedMut::Many(&mut self.children)),
                _ => None,
            }
        }
    }

    fn join_rows() -> MemoryRows {
        MemoryRows::new(
            ["parent.id", "child.id"],
            vec![
                vec![Value::Int(1), Value::Int(10)],
                vec![Value::Int(1), Value::Int(11)],
                vec![Value::Int(2), Value::Int(20)],
            ],
        )
    }

    #[test]
    fn one_to_many_rows_deduplicate_by_identity() {
        let mut out: Vec<Parent> = Vec::new();
        let consumed = materialize_all(join_rows(), &mut out).unwrap();

        assert_eq!(consumed, 3);
        assert_eq!(
            out,
            vec![
                Parent {
                    id: 1,
                    children: vec![Child { id: 10 }, Child { id: 11 }],
                },
                Parent {
                    id: 2,
                    children: vec![Child { id: 20 }],
                },
            ]
        );
    }

    #[test]
    fn unbound_result_set_consumes_nothing() {
        let rows = MemoryRows::new(["other.a"], vec![vec![Value::Int(5)]]);
        let mut out: Vec<Parent> = Vec::new();
        assert_eq!(materialize_all(rows, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn all_null_rows_leave_no_phantom_elements() {
        let rows = MemoryRows::new(
            ["parent.id", "child.id"],
            vec![vec![Value::Null, Value::Null]],
        );
        let mut out: Vec<Parent> = Vec::new();
        assert_eq!(materialize_all(rows, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn materialize_one_reports_no_rows() {
        let rows = MemoryRows::new(["parent.id"], vec![]);
        let mut out = Parent::default();
        assert!(matches!(
            materialize_one(rows, &mut out),
            Err(TrellisError::NoRows)
        ));
    }

    #[test]
    fn shared_cache_is_reusable_across_calls() {
        let materializer = Materializer::new();
        let mut first: Vec<Parent> = Vec::new();
        let mut second: Vec<Parent> = Vec::new();
        materializer.materialize_all(join_rows(), &mut first).unwrap();
        materializer.materialize_all(join_rows(), &mut second).unwrap();
        assert_eq!(first, second);
    }
}
