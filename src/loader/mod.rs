//! Buffered bulk loading into one table.
//!
//! A [`Loader`] walks through `Unopened → Open → Closed`. Opening reads the
//! table's writable columns from the catalog and, if configured, disables the
//! constraints referencing the table. While open, the caller fills the current
//! row with [`Loader::set_value`] and commits it with [`Loader::next_row`].
//! Rows are buffered and sent as one array-bound insert whenever the buffer
//! reaches its capacity, and once more on [`Loader::close`], which also
//! re-enables the constraints disabled by `open`.
//!
//! Values are validated as they are set, so a bad value never reaches the
//! buffer. Missing required columns are detected when the row is committed.

mod session;
mod types;

pub use types::{Connection, LoadSummary, LoaderState};

use crate::config::LoaderConfig;
use crate::error_handling::LoaderError;
use crate::schema::{validator, ColumnInfo, TableSchema, Value};
use crate::storage::ConstraintManager;

use session::Session;

/// Bulk loader for a single table.
///
/// The loader owns its connection. Pass `&mut backend` to keep using the
/// backend after the load.
///
/// # Examples
///
/// ```no_run
/// use table_loader::{Loader, LoaderConfig, SqliteBackend};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut backend = SqliteBackend::open("people.db".as_ref())?;
/// let mut loader = Loader::new(&mut backend, LoaderConfig::new("people"));
/// loader.open()?;
/// loader.set_value("id", 1)?;
/// loader.set_value("name", "Ada")?;
/// loader.next_row()?;
/// let summary = loader.close()?;
/// assert_eq!(summary.rows_inserted, 1);
/// # Ok(())
/// # }
/// ```
pub struct Loader<C: Connection> {
    config: LoaderConfig,
    connection: C,
    state: LoaderState,
    session: Option<Session>,
    constraints: ConstraintManager,
    summary: LoadSummary,
}

impl<C: Connection> Loader<C> {
    pub fn new(connection: C, config: LoaderConfig) -> Self {
        Self {
            config,
            connection,
            state: LoaderState::Unopened,
            session: None,
            constraints: ConstraintManager::new(),
            summary: LoadSummary::default(),
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Writable columns of the target table, empty before `open`.
    pub fn columns(&self) -> &[ColumnInfo] {
        self.session
            .as_ref()
            .map_or(&[], |session| session.schema.columns())
    }

    /// Rows buffered and not yet flushed, counting a partially filled current row.
    pub fn buffered_rows(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.store.populated_len())
    }

    /// Totals so far.
    pub fn summary(&self) -> LoadSummary {
        self.summary
    }

    /// Loads the table schema, disables constraints and starts the first row.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the loader is unopened
    /// - `Configuration` for an invalid configuration or a table without
    ///   writable columns
    /// - `Database` if the catalog or constraint directory fails; the loader
    ///   stays unopened and no constraint is left disabled
    pub fn open(&mut self) -> Result<(), LoaderError> {
        if self.state != LoaderState::Unopened {
            return Err(LoaderError::InvalidState {
                operation: "open",
                state: self.state,
            });
        }
        self.config.validate()?;

        let table = self.config.table_name.as_str();
        let schema = TableSchema::from_catalog(table, self.connection.columns(table)?);
        if schema.is_empty() {
            return Err(LoaderError::Configuration(format!(
                "table {} has no writable columns",
                table
            )));
        }

        let disabled = if self.config.disable_constraints {
            self.constraints.disable(&mut self.connection, table)?
        } else {
            0
        };

        log::info!(
            "Opened load into {} ({} columns, buffer size {}, {} constraint(s) disabled)",
            table,
            schema.len(),
            self.config.buffer_size,
            disabled
        );
        self.session = Some(Session::new(schema, self.config.buffer_size));
        self.state = LoaderState::Open;
        Ok(())
    }

    /// Sets one column of the current row.
    ///
    /// The value is converted to the column's semantic type before it is
    /// stored. Setting the same column twice keeps the last value.
    ///
    /// # Errors
    ///
    /// `UnknownColumn`, `NullNotAllowed` and `TypeMismatch` leave the current
    /// row untouched.
    pub fn set_value(&mut self, column: &str, value: impl Into<Value>) -> Result<(), LoaderError> {
        let session = open_session(self.state, &mut self.session, "set a value")?;

        let (position, info) =
            session
                .schema
                .lookup(column)
                .ok_or_else(|| LoaderError::UnknownColumn {
                    column: column.to_string(),
                })?;
        let value = validator::validate(value.into(), info)
            .map_err(|e| LoaderError::from_validation(&info.name, e))?;

        session.store.current_mut().set(position, value);
        Ok(())
    }

    /// Commits the current row and starts a new one.
    ///
    /// When the buffer is full, every buffered row is flushed first. A row
    /// with no column set is accepted here and dropped at flush time.
    ///
    /// # Errors
    ///
    /// - `NullNotAllowed` listing every required column without a value; the
    ///   row stays current so the caller can complete it
    /// - `Database` if the flush fails; the buffered rows are lost and the
    ///   loader moves on to a new empty row
    pub fn next_row(&mut self) -> Result<(), LoaderError> {
        let session = open_session(self.state, &mut self.session, "advance to the next row")?;

        let missing = session.missing_required();
        if !missing.is_empty() {
            return Err(LoaderError::NullNotAllowed { columns: missing });
        }

        let flushed = if session.store.is_full() {
            Some(
                session
                    .flusher
                    .flush(&mut session.store, &mut self.connection),
            )
        } else {
            None
        };
        session.store.advance();

        if let Some(result) = flushed {
            self.summary.record(result?);
        }
        Ok(())
    }

    /// Flushes the remaining rows and re-enables the disabled constraints.
    ///
    /// Closing a closed loader only retries constraints that could not be
    /// re-enabled earlier, and returns the same summary.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the loader was never opened
    /// - `NullNotAllowed` if the current row is incomplete; the loader stays
    ///   open and nothing is flushed
    /// - `Database` if the final flush or a constraint re-enable fails. The
    ///   loader is closed either way, and constraints are re-enabled even when
    ///   the flush fails.
    pub fn close(&mut self) -> Result<LoadSummary, LoaderError> {
        match self.state {
            LoaderState::Unopened => {
                return Err(LoaderError::InvalidState {
                    operation: "close",
                    state: self.state,
                })
            }
            LoaderState::Closed => {
                self.restore_constraints()?;
                return Ok(self.summary);
            }
            LoaderState::Open => {}
        }

        let session = open_session(self.state, &mut self.session, "close")?;
        let missing = session.missing_required();
        if !missing.is_empty() {
            return Err(LoaderError::NullNotAllowed { columns: missing });
        }

        // The current row is committed implicitly; when empty it is not a dropped row.
        let trailing_empty = session.store.current().is_empty();
        let flushed = session
            .flusher
            .flush(&mut session.store, &mut self.connection);
        self.state = LoaderState::Closed;
        let restored = self.restore_constraints();

        match flushed {
            Ok(mut result) => {
                if trailing_empty {
                    result.empty_rows_dropped = result.empty_rows_dropped.saturating_sub(1);
                }
                self.summary.record(result);
            }
            Err(e) => {
                if let Err(restore_err) = restored {
                    log::error!(
                        "Constraints on {} not re-enabled after failed flush: {}",
                        self.config.table_name,
                        restore_err
                    );
                }
                return Err(e.into());
            }
        }
        restored?;

        log::info!(
            "Closed load into {}: {} rows inserted in {} flush(es)",
            self.config.table_name,
            self.summary.rows_inserted,
            self.summary.flushes
        );
        Ok(self.summary)
    }

    fn restore_constraints(&mut self) -> Result<(), LoaderError> {
        self.constraints
            .enable(&mut self.connection, &self.config.table_name)?;
        Ok(())
    }
}

impl<C: Connection> Drop for Loader<C> {
    fn drop(&mut self) {
        if self.state == LoaderState::Open {
            log::warn!(
                "Loader for {} dropped while open, discarding {} buffered row(s)",
                self.config.table_name,
                self.buffered_rows()
            );
        }
        if !self.constraints.disabled().is_empty() {
            if let Err(e) = self
                .constraints
                .enable(&mut self.connection, &self.config.table_name)
            {
                log::error!(
                    "Failed to re-enable constraints on {} while dropping loader: {}",
                    self.config.table_name,
                    e
                );
            }
        }
    }
}

fn open_session<'a>(
    state: LoaderState,
    session: &'a mut Option<Session>,
    operation: &'static str,
) -> Result<&'a mut Session, LoaderError> {
    match session {
        Some(session) if state == LoaderState::Open => Ok(session),
        _ => Err(LoaderError::InvalidState { operation, state }),
    }
}
