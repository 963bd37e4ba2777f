use trellis::ColumnIndex;

fn index(names: &[&str]) -> ColumnIndex {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    ColumnIndex::new(&names)
}

#[test]
fn owner_qualified_lookup() {
    let idx = index(&["author.id", "author.name", "post.id"]);
    assert_eq!(idx.lookup("author", "id"), Some(0));
    assert_eq!(idx.lookup("author", "name"), Some(1));
    assert_eq!(idx.lookup("post", "id"), Some(2));
}

#[test]
fn normalization_ignores_case_and_separators() {
    let idx = index(&["Author.Display_Name", "post.created-at"]);
    assert_eq!(idx.lookup("author", "displayname"), Some(0));
    assert_eq!(idx.lookup("author", "Display Name"), Some(0));
    assert_eq!(idx.lookup("POST", "CreatedAt"), Some(1));
}

#[test]
fn bare_columns_match_any_owner() {
    let idx = index(&["id", "title"]);
    assert_eq!(idx.lookup("post", "id"), Some(0));
    assert_eq!(idx.lookup("whatever", "title"), Some(1));
}

#[test]
fn misses_are_none_not_errors() {
    let idx = index(&["author.id"]);
    assert_eq!(idx.lookup("author", "missing"), None);
    // qualified columns do not leak into other owners
    assert_eq!(idx.lookup("missing", "id"), None);
}

#[test]
fn empty_result_set_is_fine() {
    let idx = index(&[]);
    assert!(idx.is_empty());
    assert_eq!(idx.lookup("a", "b"), None);
}
