//! Configuration and constants.
//!
//! This module provides:
//! - Configuration constants (default buffer size, table name pattern, etc.)
//! - The loader configuration
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LoaderConfig, LogFormat, LogLevel, Opt};
