//! Batch flushing.
//!
//! Turns the buffered rows into one array-bound insert and executes it in a
//! single round trip.

mod statement;

pub use statement::{quote_identifier, ArrayParameter, InsertStatement};

use crate::error_handling::DatabaseError;
use crate::schema::{ColumnInfo, TableSchema};

use super::executor::SqlExecutor;
use super::record::{Record, RowStore};

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushResult {
    /// Rows sent to the database
    pub rows: usize,
    /// Rows dropped because no column was set
    pub empty_rows_dropped: usize,
}

/// Builds and executes the batched insert for one table.
#[derive(Debug, Clone)]
pub struct BatchFlusher {
    statement: InsertStatement,
    columns: Vec<ColumnInfo>,
}

impl BatchFlusher {
    pub fn new(schema: &TableSchema) -> Self {
        Self {
            statement: InsertStatement::new(schema.table(), schema.columns()),
            columns: schema.columns().to_vec(),
        }
    }

    pub fn statement(&self) -> &InsertStatement {
        &self.statement
    }

    /// Flushes every row held by `store`.
    ///
    /// The store is emptied before execution, so a failed flush loses the batch.
    /// Rows with no column set are dropped without being sent.
    pub fn flush<E: SqlExecutor + ?Sized>(
        &self,
        store: &mut RowStore,
        executor: &mut E,
    ) -> Result<FlushResult, DatabaseError> {
        let taken = store.take_all();
        let total = taken.len();
        let mut rows: Vec<Record> = taken.into_iter().filter(|r| !r.is_empty()).collect();
        let empty_rows_dropped = total - rows.len();

        if rows.is_empty() {
            log::debug!(
                "Nothing to flush for {} ({} empty rows dropped)",
                self.statement.table(),
                empty_rows_dropped
            );
            return Ok(FlushResult {
                rows: 0,
                empty_rows_dropped,
            });
        }

        let count = rows.len();
        let parameters = self.bind_columns(&mut rows);

        log::debug!(
            "Flushing batch of {} rows into {}",
            count,
            self.statement.table()
        );
        let affected = executor.execute_batch(&self.statement, &parameters)?;
        if affected != count as u64 {
            log::warn!(
                "Batch insert into {} reported {} affected rows for {} bound rows",
                self.statement.table(),
                affected,
                count
            );
        }
        log::debug!("Successfully flushed {} rows", count);

        Ok(FlushResult {
            rows: count,
            empty_rows_dropped,
        })
    }

    /// Pivots row-major records into one value array per column.
    fn bind_columns(&self, rows: &mut [Record]) -> Vec<ArrayParameter> {
        self.columns
            .iter()
            .enumerate()
            .map(|(position, column)| ArrayParameter {
                position,
                column: column.name.clone(),
                provider_type: column.provider_type.clone(),
                size: column.size,
                values: rows.iter_mut().map(|r| r.take(position)).collect(),
            })
            .collect()
    }
}
