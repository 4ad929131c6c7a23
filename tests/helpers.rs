// Shared test helpers for loader and backend tests.
//
// Provides a recording in-memory connection and SQLite setup utilities used
// across multiple test files.

use table_loader::schema::CatalogColumn;
use table_loader::storage::{ArrayParameter, Constraint, ConstraintStatus, InsertStatement};
use table_loader::{
    ColumnInfo, ConstraintDirectory, DatabaseError, SchemaCatalog, SemanticType, SqlExecutor,
    SqliteBackend, Value,
};

/// One executed batch: statement text plus the bound column arrays.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedBatch {
    pub text: String,
    pub parameters: Vec<ArrayParameter>,
}

impl RecordedBatch {
    /// Number of rows in the batch.
    #[allow(dead_code)] // Used by other test files
    pub fn rows(&self) -> usize {
        self.parameters.first().map_or(0, |p| p.values.len())
    }

    /// Bound values of the column at `position`.
    #[allow(dead_code)]
    pub fn column(&self, position: usize) -> &[Value] {
        &self.parameters[position].values
    }
}

/// Connection that serves a fixed catalog and records every call.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MockConnection {
    pub catalog: Vec<CatalogColumn>,
    pub constraints: Vec<Constraint>,
    pub batches: Vec<RecordedBatch>,
    pub statements: Vec<String>,
    pub fail_batches: bool,
}

impl SchemaCatalog for MockConnection {
    fn columns(&mut self, table: &str) -> Result<Vec<CatalogColumn>, DatabaseError> {
        if self.catalog.is_empty() {
            return Err(DatabaseError::TableNotFound(table.to_string()));
        }
        Ok(self.catalog.clone())
    }
}

impl SqlExecutor for MockConnection {
    fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        self.statements.push(sql.to_string());
        for c in &mut self.constraints {
            if sql.contains(&format!("\"{}\"", c.name)) {
                c.status = if sql.contains(" ENABLE ") {
                    ConstraintStatus::Enabled
                } else {
                    ConstraintStatus::Disabled
                };
            }
        }
        Ok(0)
    }

    fn execute_batch(
        &mut self,
        statement: &InsertStatement,
        parameters: &[ArrayParameter],
    ) -> Result<u64, DatabaseError> {
        if self.fail_batches {
            return Err(DatabaseError::ExecutionFailed(
                "unique constraint violated".to_string(),
            ));
        }
        let batch = RecordedBatch {
            text: statement.text().to_string(),
            parameters: parameters.to_vec(),
        };
        let rows = batch.rows() as u64;
        self.batches.push(batch);
        Ok(rows)
    }
}

// Toggling goes through the default ALTER TABLE implementation.
impl ConstraintDirectory for MockConnection {
    fn constraints_referencing(&mut self, _table: &str) -> Result<Vec<Constraint>, DatabaseError> {
        Ok(self.constraints.clone())
    }
}

/// Mock catalog for `people(id INTEGER NOT NULL, name TEXT, age INTEGER)`.
#[allow(dead_code)]
pub fn people_connection() -> MockConnection {
    MockConnection {
        catalog: vec![
            CatalogColumn::writable(ColumnInfo::new("id", SemanticType::Integer, false)),
            CatalogColumn::writable(ColumnInfo::new("name", SemanticType::Text, true)),
            CatalogColumn::writable(ColumnInfo::new("age", SemanticType::Integer, true)),
        ],
        ..Default::default()
    }
}

/// Creates an in-memory SQLite backend and runs `ddl` on it.
#[allow(dead_code)]
pub fn sqlite_with_schema(ddl: &str) -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to open in-memory database");
    backend
        .block_on(sqlx::raw_sql(ddl).execute(backend.pool()))
        .expect("Failed to create schema");
    backend
}

/// Counts the rows of `table`.
#[allow(dead_code)]
pub fn count_rows(backend: &SqliteBackend, table: &str) -> i64 {
    backend
        .block_on(
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(backend.pool()),
        )
        .expect("Failed to count rows")
}
