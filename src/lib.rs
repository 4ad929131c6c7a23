//! table_loader library: buffered bulk loading into relational tables
//!
//! Callers set column values row by row. The loader validates each value
//! against the destination table's schema, buffers complete rows, and
//! flushes them as array-bound multi-row inserts, one round trip per batch.
//! Constraints referencing the table can be disabled for the duration of the
//! load and are re-enabled when it closes.
//!
//! # Example
//!
//! ```no_run
//! use table_loader::{Loader, LoaderConfig, SqliteBackend};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut backend = SqliteBackend::open("shop.db".as_ref())?;
//! let config = LoaderConfig {
//!     buffer_size: 500,
//!     ..LoaderConfig::new("orders")
//! };
//!
//! let mut loader = Loader::new(&mut backend, config);
//! loader.open()?;
//! for id in 0..10_000 {
//!     loader.set_value("id", id)?;
//!     loader.set_value("status", "new")?;
//!     loader.next_row()?;
//! }
//! let summary = loader.close()?;
//! println!("Inserted {} rows in {} flushes", summary.rows_inserted, summary.flushes);
//! # Ok(())
//! # }
//! ```
//!
//! # Backends
//!
//! The loader talks to the database only through [`SchemaCatalog`],
//! [`SqlExecutor`] and [`ConstraintDirectory`]. [`SqliteBackend`] implements
//! all three on top of `sqlx`; it blocks on a private runtime and must not be
//! called from async code.

pub mod config;
mod error_handling;
pub mod import;
pub mod initialization;
pub mod loader;
pub mod schema;
pub mod storage;

// Re-export public API
pub use config::{LoaderConfig, LogFormat, LogLevel, Opt};
pub use error_handling::{DatabaseError, InitializationError, LoaderError};
pub use loader::{Connection, LoadSummary, Loader, LoaderState};
pub use schema::{ColumnInfo, SchemaCatalog, SemanticType, Value};
pub use storage::{ConstraintDirectory, SqlExecutor, SqliteBackend};
