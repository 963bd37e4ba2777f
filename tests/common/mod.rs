#![allow(dead_code)]

use trellis::prelude::*;

// Blog-flavored destination graph shared across the integration tests.

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Author {
    #[model(id)]
    pub id: i64,
    pub name: String,
    pub posts: Vec<Post>,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Post {
    #[model(id)]
    pub id: i64,
    pub title: String,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Comment {
    #[model(id)]
    pub id: i64,
    pub body: String,
}

/// Builds an in-memory result set from literal rows.
pub fn rows(columns: &[&str], data: Vec<Vec<Value<'static>>>) -> MemoryRows {
    MemoryRows::new(columns.iter().copied(), data)
}

pub fn text(value: &'static str) -> Value<'static> {
    Value::from(value)
}

pub fn int(value: i64) -> Value<'static> {
    Value::Int(value)
}

pub fn null() -> Value<'static> {
    Value::Null
}
