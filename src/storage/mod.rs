// storage/mod.rs
// Buffering, flushing and database-facing interfaces

pub mod batch;
pub mod constraints;
pub mod executor;
pub mod pool;
pub mod record;
pub mod sqlite;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use batch::{ArrayParameter, BatchFlusher, FlushResult, InsertStatement};
pub use constraints::{
    Constraint, ConstraintDirectory, ConstraintKind, ConstraintManager, ConstraintStatus,
};
pub use executor::SqlExecutor;
pub use record::{Record, RowStore};
pub use sqlite::SqliteBackend;
