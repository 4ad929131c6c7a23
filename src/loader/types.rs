//! Loader state and result types.

use strum_macros::Display;

use crate::schema::SchemaCatalog;
use crate::storage::{ConstraintDirectory, FlushResult, SqlExecutor};

/// Everything the loader needs from one database connection.
pub trait Connection: SchemaCatalog + SqlExecutor + ConstraintDirectory {}

impl<T: SchemaCatalog + SqlExecutor + ConstraintDirectory + ?Sized> Connection for T {}

/// Lifecycle of a loader: `Unopened → Open → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LoaderState {
    Unopened,
    Open,
    Closed,
}

/// Totals for one load session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows handed to the database across all flushes
    pub rows_inserted: usize,
    /// Flushes that executed an insert
    pub flushes: usize,
    /// Rows dropped at flush time because no column was set
    pub empty_rows_dropped: usize,
}

impl LoadSummary {
    pub(crate) fn record(&mut self, result: FlushResult) {
        if result.rows > 0 {
            self.flushes += 1;
        }
        self.rows_inserted += result.rows;
        self.empty_rows_dropped += result.empty_rows_dropped;
    }
}
