//! Column name normalization and position lookup.

use std::hash::{DefaultHasher, Hash, Hasher};

use hashbrown::HashMap;

/// Lookup from canonical `owner.field` identifiers to column positions.
///
/// Built once per result set from the driver's column name list. Names
/// follow the `Owner.Field` convention (or bare `Field`); lookups are
/// case- and punctuation-insensitive. An unmapped identifier resolves to
/// `None`, which is never an error — partial projections are normal.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    slots: HashMap<String, usize>,
    fingerprint: u64,
}

impl ColumnIndex {
    pub fn new(columns: &[String]) -> Self {
        let mut slots = HashMap::with_capacity(columns.len());
        let mut hasher = DefaultHasher::new();
        for (position, name) in columns.iter().enumerate() {
            let key = match name.split_once('.') {
                Some((owner, field)) => {
                    let mut key = normalized(owner);
                    key.push('.');
                    normalize_into(field, &mut key);
                    key
                }
                None => normalized(name),
            };
            key.hash(&mut hasher);
            position.hash(&mut hasher);
            // first occurrence wins on duplicate names
            slots.entry(key).or_insert(position);
        }
        Self {
            slots,
            fingerprint: hasher.finish(),
        }
    }

    /// Resolves a field of `owner`, falling back to the bare field name
    /// for result sets with unqualified column names.
    pub fn lookup(&self, owner: &str, field: &str) -> Option<usize> {
        let owner = normalized(owner);
        let field = normalized(field);
        let mut key = String::with_capacity(owner.len() + field.len() + 1);
        key.push_str(&owner);
        key.push('.');
        key.push_str(&field);
        self.slots
            .get(&key)
            .or_else(|| self.slots.get(&field))
            .copied()
    }

    /// Order-sensitive hash of the normalized column list; qualifies
    /// descriptor-cache keys so one cache serves many result-set shapes.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Lowercases and strips spaces, dashes and underscores.
pub(crate) fn normalized(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    normalize_into(name, &mut out);
    out
}

fn normalize_into(name: &str, out: &mut String) {
    for ch in name.chars() {
        match ch {
            ' ' | '-' | '_' => {}
            _ => out.extend(ch.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> ColumnIndex {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        ColumnIndex::new(&names)
    }

    #[test]
    fn qualified_names_resolve_by_owner() {
        let idx = index(&["author.id", "post.id"]);
        assert_eq!(idx.lookup("author", "id"), Some(0));
        assert_eq!(idx.lookup("post", "id"), Some(1));
    }

    #[test]
    fn lookup_is_case_and_punctuation_insensitive() {
        let idx = index(&["Author.Created_At"]);
        assert_eq!(idx.lookup("author", "createdat"), Some(0));
        assert_eq!(idx.lookup("AUTHOR", "created-at"), Some(0));
        assert_eq!(idx.lookup("author", "Created At"), Some(0));
    }

    #[test]
    fn bare_names_serve_as_fallback() {
        let idx = index(&["parent_id"]);
        assert_eq!(idx.lookup("parent", "parentid"), None);
        assert_eq!(idx.lookup("anything", "parent_id"), Some(0));
    }

    #[test]
    fn unmapped_fields_resolve_to_none() {
        let idx = index(&["author.id"]);
        assert_eq!(idx.lookup("author", "name"), None);
    }

    #[test]
    fn first_occurrence_wins_on_duplicates() {
        let idx = index(&["author.id", "author.id"]);
        assert_eq!(idx.lookup("author", "id"), Some(0));
    }

    #[test]
    fn fingerprint_tracks_column_shape() {
        let a = index(&["author.id", "author.name"]);
        let b = index(&["author.id", "author.name"]);
        let c = index(&["author.name", "author.id"]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
