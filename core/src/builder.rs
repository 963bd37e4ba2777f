//! Runtime SELECT builder — pure SQL generation layer, no connection.
//!
//! Projections are emitted as `"owner"."field" AS "owner.field"`, the
//! naming convention the column index understands, so a query built here
//! produces result sets the materializer binds without configuration.

use std::borrow::Cow;

use crate::conversions::ToSQL;
use crate::param::{PlaceholderStyle, SQLParam};
use crate::sql::SQL;

/// Direction for ORDER BY clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Asc,
    Desc,
}

/// Builds a SELECT statement from typed fragments.
///
/// ```
/// use trellis_core::{QueryBuilder, PlaceholderStyle, Value};
///
/// let query = QueryBuilder::new()
///     .columns("author", &["id", "name"])
///     .from("authors", "author")
///     .left_join("posts", "post", "post.author_id = author.id")
///     .filter(trellis_core::SQL::raw("author.active =").append(trellis_core::SQL::param(Value::Int(1))))
///     .limit(10)
///     .build();
/// let (text, params) = query.build(PlaceholderStyle::Positional);
/// assert!(text.starts_with("SELECT"));
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct QueryBuilder<'a, V: SQLParam> {
    projection: Vec<SQL<'a, V>>,
    from: Option<SQL<'a, V>>,
    joins: Vec<SQL<'a, V>>,
    filter: Option<SQL<'a, V>>,
    order_by: Option<SQL<'a, V>>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl<'a, V: SQLParam + 'a> QueryBuilder<'a, V> {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            projection: Vec::new(),
            from: None,
            joins: Vec::new(),
            filter: None,
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    /// Adds one projected column, aliased as `owner.field`.
    pub fn column(mut self, owner: &str, field: &str) -> Self {
        self.projection.push(projected(owner, field));
        self
    }

    /// Adds every field of `owner` to the projection.
    pub fn columns(mut self, owner: &str, fields: &[&str]) -> Self {
        for field in fields {
            self.projection.push(projected(owner, field));
        }
        self
    }

    /// Adds a raw select expression (aggregate, computed column).
    pub fn select(mut self, expr: impl ToSQL<'a, V>) -> Self {
        self.projection.push(expr.to_sql());
        self
    }

    /// Sets the FROM table with its alias.
    pub fn from(mut self, table: &str, alias: &str) -> Self {
        self.from = Some(
            SQL::ident(table.to_string()).append(SQL::raw(Cow::Owned(format!("AS \"{alias}\"")))),
        );
        self
    }

    /// Adds an INNER JOIN.
    pub fn join(mut self, table: &str, alias: &str, on: &str) -> Self {
        self.joins.push(join_clause("JOIN", table, alias, on));
        self
    }

    /// Adds a LEFT JOIN.
    pub fn left_join(mut self, table: &str, alias: &str, on: &str) -> Self {
        self.joins.push(join_clause("LEFT JOIN", table, alias, on));
        self
    }

    /// Sets the WHERE clause.
    pub fn filter(mut self, condition: impl ToSQL<'a, V>) -> Self {
        self.filter = Some(condition.to_sql());
        self
    }

    /// Sets ORDER BY for one column.
    pub fn order_by(mut self, owner: &str, field: &str, direction: OrderBy) -> Self {
        let dir = match direction {
            OrderBy::Asc => "ASC",
            OrderBy::Desc => "DESC",
        };
        let clause = SQL::raw(Cow::Owned(format!("\"{owner}\".\"{field}\" {dir}")));
        self.order_by = Some(match self.order_by.take() {
            Some(prior) => prior.append(SQL::raw(",")).append(clause),
            None => clause,
        });
        self
    }

    /// Sets LIMIT.
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET.
    pub fn offset(mut self, n: u32) -> Self {
        self.offset = Some(n);
        self
    }

    /// Assembles the final SELECT fragment.
    pub fn build(self) -> SQL<'a, V> {
        let mut sql = SQL::raw("SELECT");
        if self.projection.is_empty() {
            sql.append_mut(SQL::raw("*"));
        } else {
            sql.append_mut(SQL::join(self.projection, ","));
        }
        if let Some(from) = self.from {
            sql.append_mut(SQL::raw("FROM"));
            sql.append_mut(from);
        }
        for join in self.joins {
            sql.append_mut(join);
        }
        if let Some(filter) = self.filter {
            sql.append_mut(SQL::raw("WHERE"));
            sql.append_mut(filter);
        }
        if let Some(order_by) = self.order_by {
            sql.append_mut(SQL::raw("ORDER BY"));
            sql.append_mut(order_by);
        }
        if let Some(limit) = self.limit {
            sql.append_mut(SQL::raw(Cow::Owned(format!("LIMIT {limit}"))));
        }
        if let Some(offset) = self.offset {
            sql.append_mut(SQL::raw(Cow::Owned(format!("OFFSET {offset}"))));
        }
        sql
    }
}

fn projected<'a, V: SQLParam>(owner: &str, field: &str) -> SQL<'a, V> {
    SQL::raw(Cow::Owned(format!(
        "\"{owner}\".\"{field}\" AS \"{owner}.{field}\""
    )))
}

fn join_clause<'a, V: SQLParam>(kind: &'static str, table: &str, alias: &str, on: &str) -> SQL<'a, V> {
    SQL::raw(kind)
        .append(SQL::ident(table.to_string()))
        .append(SQL::raw(Cow::Owned(format!("AS \"{alias}\" ON {on}"))))
}
