//! Error handling.
//!
//! Error kinds are split by origin:
//! - **Loader errors**: configuration, validation and state errors raised by the loader
//! - **Database errors**: failures from the catalog, executor or constraint directory
//! - **Initialization errors**: logger setup failures

mod types;

// Re-export public API
pub use types::{DatabaseError, InitializationError, LoaderError};
