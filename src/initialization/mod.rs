//! Application initialization.
//!
//! Sets up process-wide resources used by the CLI binary. The library itself
//! only emits `log` records and never installs a logger.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
