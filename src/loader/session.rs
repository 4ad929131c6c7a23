//! Per-open state of a loader.

use crate::schema::{TableSchema, Value};
use crate::storage::{BatchFlusher, RowStore};

/// Schema, buffered rows and flusher created by `open`.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) schema: TableSchema,
    pub(crate) store: RowStore,
    pub(crate) flusher: BatchFlusher,
}

impl Session {
    pub(crate) fn new(schema: TableSchema, buffer_size: usize) -> Self {
        Self {
            store: RowStore::new(schema.len(), buffer_size),
            flusher: BatchFlusher::new(&schema),
            schema,
        }
    }

    /// Non-nullable columns without a value in the current row, in schema order.
    ///
    /// An empty current row is never validated.
    pub(crate) fn missing_required(&self) -> Vec<String> {
        let current = self.store.current();
        if current.is_empty() {
            return Vec::new();
        }

        self.schema
            .columns()
            .iter()
            .enumerate()
            .filter(|(position, column)| {
                !column.allow_null && current.get(*position).map_or(true, Value::is_null)
            })
            .map(|(_, column)| column.name.clone())
            .collect()
    }
}
