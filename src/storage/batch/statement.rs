//! Insert statement text and array-bound parameters.

use crate::schema::{ColumnInfo, Value};

/// The parameterized insert used for every flush of a session.
///
/// Text has the shape `INSERT INTO <table> ("c1", "c2") VALUES (:0, :1)`,
/// one positional parameter per writable column. Column names come from the
/// catalog and are always quoted; the table name is a checked identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    table: String,
    columns: Vec<String>,
    text: String,
}

impl InsertStatement {
    pub fn new(table: &str, columns: &[ColumnInfo]) -> Self {
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let quoted: Vec<String> = names.iter().map(|n| quote_identifier(n)).collect();
        let placeholders: Vec<String> = (0..names.len()).map(|i| format!(":{}", i)).collect();
        let text = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            quoted.join(", "),
            placeholders.join(", ")
        );
        Self {
            table: table.to_string(),
            columns: names,
            text,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Wraps an identifier in double quotes, doubling embedded quotes.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Values bound to one positional parameter, one entry per row of the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayParameter {
    /// Zero-based parameter position, equal to the column ordinal
    pub position: usize,
    pub column: String,
    /// Driver-specific type tag of the column
    pub provider_type: String,
    pub size: usize,
    /// Per-row values; rows that never set the column hold `Value::Null`
    pub values: Vec<Value>,
}
