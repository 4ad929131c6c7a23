//! Table schema model and value validation.
//!
//! This module provides:
//! - Column metadata (`ColumnInfo`) and the `SchemaCatalog` interface
//! - The `Value` type handed to the loader
//! - The column validator and its conversion table

mod types;
pub mod validator;
mod value;

// Re-export public API
pub use types::{CatalogColumn, ColumnInfo, SchemaCatalog, SemanticType, TableSchema};
pub use validator::{validate, ValidationError};
pub use value::Value;
