//! SQL execution interface consumed by the loader.

use crate::error_handling::DatabaseError;

use super::batch::{ArrayParameter, InsertStatement};

/// Blocking statement execution on one connection.
pub trait SqlExecutor {
    /// Executes a statement without parameters and returns the affected row count.
    fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError>;

    /// Executes `statement` once with column-wise array binding.
    ///
    /// `parameters` holds one entry per statement column, in column order,
    /// and every value array has the same length: the number of rows in the
    /// batch. Implementations must send the batch in a single round trip.
    fn execute_batch(
        &mut self,
        statement: &InsertStatement,
        parameters: &[ArrayParameter],
    ) -> Result<u64, DatabaseError>;
}

impl<T: SqlExecutor + ?Sized> SqlExecutor for &mut T {
    fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        (**self).execute(sql)
    }

    fn execute_batch(
        &mut self,
        statement: &InsertStatement,
        parameters: &[ArrayParameter],
    ) -> Result<u64, DatabaseError> {
        (**self).execute_batch(statement, parameters)
    }
}
