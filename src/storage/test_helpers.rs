//! Shared test helpers for storage module tests.

#[cfg(test)]
use crate::error_handling::DatabaseError;
#[cfg(test)]
use crate::storage::batch::{ArrayParameter, InsertStatement};
#[cfg(test)]
use crate::storage::executor::SqlExecutor;

/// Executor that records every statement instead of running it.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub statements: Vec<String>,
    pub batches: Vec<(String, Vec<ArrayParameter>)>,
    pub fail_batches: bool,
}

#[cfg(test)]
impl SqlExecutor for RecordingExecutor {
    fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        self.statements.push(sql.to_string());
        Ok(0)
    }

    fn execute_batch(
        &mut self,
        statement: &InsertStatement,
        parameters: &[ArrayParameter],
    ) -> Result<u64, DatabaseError> {
        if self.fail_batches {
            return Err(DatabaseError::ExecutionFailed(
                "batch rejected".to_string(),
            ));
        }
        self.batches
            .push((statement.text().to_string(), parameters.to_vec()));
        Ok(parameters.first().map_or(0, |p| p.values.len() as u64))
    }
}

/// In-memory connection with a fixed catalog and constraint list.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakeConnection {
    pub catalog: Vec<crate::schema::CatalogColumn>,
    pub constraints: Vec<crate::storage::Constraint>,
    pub executor: RecordingExecutor,
    pub fail_enable: bool,
}

#[cfg(test)]
impl FakeConnection {
    pub fn with_columns(columns: Vec<crate::schema::ColumnInfo>) -> Self {
        Self {
            catalog: columns
                .into_iter()
                .map(crate::schema::CatalogColumn::writable)
                .collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl crate::schema::SchemaCatalog for FakeConnection {
    fn columns(&mut self, table: &str) -> Result<Vec<crate::schema::CatalogColumn>, DatabaseError> {
        if self.catalog.is_empty() {
            return Err(DatabaseError::TableNotFound(table.to_string()));
        }
        Ok(self.catalog.clone())
    }
}

#[cfg(test)]
impl SqlExecutor for FakeConnection {
    fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        self.executor.execute(sql)
    }

    fn execute_batch(
        &mut self,
        statement: &InsertStatement,
        parameters: &[ArrayParameter],
    ) -> Result<u64, DatabaseError> {
        self.executor.execute_batch(statement, parameters)
    }
}

#[cfg(test)]
impl crate::storage::ConstraintDirectory for FakeConnection {
    fn constraints_referencing(
        &mut self,
        _table: &str,
    ) -> Result<Vec<crate::storage::Constraint>, DatabaseError> {
        Ok(self.constraints.clone())
    }

    fn set_constraint_enabled(
        &mut self,
        constraint: &crate::storage::Constraint,
        enabled: bool,
    ) -> Result<(), DatabaseError> {
        use crate::storage::ConstraintStatus;

        if enabled && self.fail_enable {
            return Err(DatabaseError::ExecutionFailed(format!(
                "cannot enable {}",
                constraint.name
            )));
        }
        for c in self.constraints.iter_mut().filter(|c| c.is_same(constraint)) {
            c.status = if enabled {
                ConstraintStatus::Enabled
            } else {
                ConstraintStatus::Disabled
            };
        }
        Ok(())
    }
}
