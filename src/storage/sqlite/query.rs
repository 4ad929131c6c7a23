//! Multi-row insert rendering and value binding for SQLite.

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

use crate::schema::Value;
use crate::storage::batch::quote_identifier;

/// SQLite's default limit on bound variables per statement (3.32+).
pub(crate) const SQLITE_MAX_VARIABLES: usize = 32_766;

/// Builds a multi-row INSERT SQL query string.
///
/// # Example
///
/// ```rust,ignore
/// let query = build_batch_insert_query("t", &["id", "name"], 2);
/// // Returns: "INSERT INTO t (\"id\", \"name\") VALUES (?, ?), (?, ?)"
/// ```
pub(crate) fn build_batch_insert_query(table_name: &str, columns: &[&str], row_count: usize) -> String {
    if row_count == 0 {
        return String::new();
    }

    let placeholder = format!(
        "({})",
        (0..columns.len()).map(|_| "?").collect::<Vec<_>>().join(", ")
    );
    let placeholders: Vec<String> = (0..row_count).map(|_| placeholder.clone()).collect();

    let quoted: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        table_name,
        quoted.join(", "),
        placeholders.join(", ")
    )
}

/// Rows per statement so that `rows * column_count` stays under the variable limit.
pub(crate) fn rows_per_statement(column_count: usize) -> usize {
    (SQLITE_MAX_VARIABLES / column_count.max(1)).max(1)
}

/// Binds one cell, choosing the SQLite storage class from the value kind.
pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.as_str()),
        Value::Bool(b) => query.bind(*b),
        Value::Date(d) => query.bind(*d),
        Value::DateTime(dt) => query.bind(*dt),
        Value::Bytes(b) => query.bind(b.as_slice()),
    }
}
