//! Blocking SQLite backend.
//!
//! Implements the schema catalog, SQL executor and constraint directory on
//! top of `sqlx`. Each call blocks on a private current-thread Tokio runtime,
//! so the backend must not be used from inside an async context.
//!
//! SQLite cannot disable an individual constraint. The directory reports
//! every foreign key referencing the target table, with a status mirroring
//! `PRAGMA foreign_keys`, and toggling any of them switches enforcement for
//! the whole connection. Primary keys are not reported.

mod query;
mod types;

use std::future::Future;
use std::path::Path;

use sqlx::{Row, SqlitePool};
use tokio::runtime::{Builder, Runtime};

use crate::error_handling::DatabaseError;
use crate::schema::{CatalogColumn, ColumnInfo, SchemaCatalog};
use crate::storage::batch::{ArrayParameter, InsertStatement};
use crate::storage::constraints::{
    Constraint, ConstraintDirectory, ConstraintKind, ConstraintStatus,
};
use crate::storage::executor::SqlExecutor;
use crate::storage::pool::{connect_pool, init_db_pool_with_path};

use query::{bind_value, build_batch_insert_query, rows_per_statement};
use types::{declared_size, semantic_type_for};

/// A single SQLite connection driven synchronously.
pub struct SqliteBackend {
    runtime: Runtime,
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let runtime = build_runtime()?;
        let pool = runtime.block_on(init_db_pool_with_path(path))?;
        Ok(Self { runtime, pool })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        let runtime = build_runtime()?;
        let pool = runtime.block_on(connect_pool("sqlite::memory:"))?;
        Ok(Self { runtime, pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs an arbitrary future on the backend's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn build_runtime() -> Result<Runtime, DatabaseError> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// Splits `schema.table`; unqualified names live in `main`.
fn split_table_name(table: &str) -> (&str, &str) {
    table.split_once('.').unwrap_or(("main", table))
}

impl SchemaCatalog for SqliteBackend {
    fn columns(&mut self, table: &str) -> Result<Vec<CatalogColumn>, DatabaseError> {
        let (schema, name) = split_table_name(table);
        let rows = self.runtime.block_on(
            sqlx::query(
                "SELECT name, type, \"notnull\" AS not_null, hidden \
                 FROM pragma_table_xinfo(?1, ?2) ORDER BY cid",
            )
            .bind(name)
            .bind(schema)
            .fetch_all(&self.pool),
        )?;

        if rows.is_empty() {
            return Err(DatabaseError::TableNotFound(table.to_string()));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let column_name: String = row.try_get("name")?;
            let declared: String = row.try_get("type")?;
            let not_null: i64 = row.try_get("not_null")?;
            let hidden: i64 = row.try_get("hidden")?;

            let info = ColumnInfo {
                name: column_name,
                semantic_type: semantic_type_for(&declared),
                allow_null: not_null == 0,
                size: declared_size(&declared),
                provider_type: declared,
            };
            // hidden: 1 = virtual table column, 2/3 = generated column
            columns.push(if hidden == 0 {
                CatalogColumn::writable(info)
            } else {
                CatalogColumn::read_only(info)
            });
        }

        log::debug!("Loaded {} catalog columns for {}", columns.len(), table);
        Ok(columns)
    }
}

impl SqlExecutor for SqliteBackend {
    fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        let result = self
            .runtime
            .block_on(sqlx::query(sql).execute(&self.pool))?;
        Ok(result.rows_affected())
    }

    /// Renders the batch as multi-row `VALUES` lists, chunked under SQLite's
    /// variable limit, inside one transaction.
    fn execute_batch(
        &mut self,
        statement: &InsertStatement,
        parameters: &[ArrayParameter],
    ) -> Result<u64, DatabaseError> {
        let row_count = parameters.first().map_or(0, |p| p.values.len());
        if row_count == 0 {
            return Ok(0);
        }

        self.runtime
            .block_on(insert_rows(&self.pool, statement, parameters, row_count))
    }
}

async fn insert_rows(
    pool: &SqlitePool,
    statement: &InsertStatement,
    parameters: &[ArrayParameter],
    row_count: usize,
) -> Result<u64, DatabaseError> {
    let columns: Vec<&str> = statement.columns().iter().map(String::as_str).collect();
    let chunk = rows_per_statement(columns.len());

    let mut tx = pool.begin().await?;
    let mut affected = 0;
    let mut start = 0;
    while start < row_count {
        let end = (start + chunk).min(row_count);
        let sql = build_batch_insert_query(statement.table(), &columns, end - start);

        let mut query = sqlx::query(&sql);
        for row in start..end {
            for parameter in parameters {
                query = bind_value(query, &parameter.values[row]);
            }
        }
        affected += query.execute(&mut *tx).await?.rows_affected();
        start = end;
    }
    tx.commit().await?;

    Ok(affected)
}

impl ConstraintDirectory for SqliteBackend {
    fn constraints_referencing(&mut self, table: &str) -> Result<Vec<Constraint>, DatabaseError> {
        let (schema, name) = split_table_name(table);
        let sql = format!(
            "SELECT DISTINCT m.name AS child, f.id AS fk_id \
             FROM \"{schema}\".sqlite_master m, pragma_foreign_key_list(m.name, ?1) f \
             WHERE m.type = 'table' AND f.\"table\" = ?2 COLLATE NOCASE \
             ORDER BY m.name, f.id"
        );

        let (enforced, rows) = self.runtime.block_on(async {
            let enforced: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
                .fetch_one(&self.pool)
                .await?;
            let rows = sqlx::query(&sql)
                .bind(schema)
                .bind(name)
                .fetch_all(&self.pool)
                .await?;
            Ok::<_, DatabaseError>((enforced, rows))
        })?;

        let status = if enforced == 1 {
            ConstraintStatus::Enabled
        } else {
            ConstraintStatus::Disabled
        };

        let mut constraints = Vec::with_capacity(rows.len());
        for row in rows {
            let child: String = row.try_get("child")?;
            let fk_id: i64 = row.try_get("fk_id")?;
            constraints.push(Constraint {
                owner: schema.to_string(),
                name: format!("fk_{}_{}", child, fk_id),
                table: child,
                kind: ConstraintKind::ForeignKey,
                status,
            });
        }
        Ok(constraints)
    }

    fn set_constraint_enabled(
        &mut self,
        constraint: &Constraint,
        enabled: bool,
    ) -> Result<(), DatabaseError> {
        log::debug!(
            "Switching foreign key enforcement {} for {}",
            if enabled { "on" } else { "off" },
            constraint.qualified_name()
        );
        let sql = if enabled {
            "PRAGMA foreign_keys = ON"
        } else {
            "PRAGMA foreign_keys = OFF"
        };
        self.execute(sql).map(|_| ())
    }
}
