#![cfg(feature = "rusqlite")]

use trellis::prelude::*;

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Author {
    #[model(id)]
    id: i64,
    name: String,
    posts: Vec<Post>,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Post {
    #[model(id)]
    id: i64,
    title: String,
}

fn seeded_connection() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch(
        r#"
        CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
        CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            author_id INTEGER NOT NULL REFERENCES authors(id),
            title TEXT NOT NULL
        );
        INSERT INTO authors (id, name) VALUES (1, 'ada'), (2, 'brian');
        INSERT INTO posts (id, author_id, title) VALUES
            (10, 1, 'On Engines'),
            (11, 1, 'Notes'),
            (20, 2, 'Hello');
        "#,
    )
    .expect("seed schema");
    conn
}

#[test]
fn end_to_end_join_materializes_nested_graph() {
    let conn = seeded_connection();

    let query: SQL<'_, Value<'_>> = QueryBuilder::new()
        .columns("author", &["id", "name"])
        .columns("post", &["id", "title"])
        .from("authors", "author")
        .left_join("posts", "post", r#""post"."author_id" = "author"."id""#)
        .order_by("author", "id", OrderBy::Asc)
        .order_by("post", "id", OrderBy::Asc)
        .build();
    let (text, _params) = query.build(PlaceholderStyle::Positional);

    let mut stmt = conn.prepare(&text).expect("prepare");
    let rows = SqliteRows::query(&mut stmt, []).expect("query");

    let mut authors: Vec<Author> = Vec::new();
    let consumed = materialize_all(rows, &mut authors).expect("materialize");

    assert_eq!(consumed, 3);
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].name, "ada");
    assert_eq!(
        authors[0]
            .posts
            .iter()
            .map(|p| p.title.as_str())
            .collect::<Vec<_>>(),
        vec!["On Engines", "Notes"]
    );
    assert_eq!(authors[1].posts.len(), 1);
}

#[test]
fn no_rows_surfaces_through_the_driver() {
    let conn = seeded_connection();

    let mut stmt = conn
        .prepare(r#"SELECT id AS "author.id", name AS "author.name" FROM authors WHERE id = 99"#)
        .expect("prepare");
    let rows = SqliteRows::query(&mut stmt, []).expect("query");

    let mut author = Author::default();
    assert!(matches!(
        materialize_one(rows, &mut author),
        Err(TrellisError::NoRows)
    ));
}
