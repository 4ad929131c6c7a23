//! Error type definitions.
//!
//! This module defines the error types surfaced by the loader, the database
//! backends and application initialization.

use log::SetLoggerError;
use thiserror::Error;

use crate::loader::LoaderState;
use crate::schema::{SemanticType, ValidationError};

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for database operations.
///
/// Every collaborator consumed by the loader (schema catalog, SQL executor,
/// constraint directory) reports failures with this type. The loader never
/// retries or rewrites them.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Error building the runtime that drives a blocking backend.
    #[error("Runtime initialization error: {0}")]
    RuntimeError(#[from] std::io::Error),

    /// The catalog has no table with the requested name.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Statement failure reported by a backend that is not sqlx-based.
    #[error("Statement execution failed: {0}")]
    ExecutionFailed(String),
}

/// Errors returned by [`Loader`](crate::Loader) operations.
///
/// Validation variants (`UnknownColumn`, `NullNotAllowed`, `TypeMismatch`)
/// leave the loader usable; the caller can correct the row and carry on.
/// `Database` wraps backend failures unmodified.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The loader configuration is unusable (missing table name, zero buffer size, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `set_value` referenced a column that is not in the loaded schema.
    #[error("Column not found: {column}")]
    UnknownColumn {
        /// The column name passed by the caller
        column: String,
    },

    /// One or more non-nullable columns are null or were never set.
    #[error("Null value not allowed for column(s): {}", .columns.join(", "))]
    NullNotAllowed {
        /// Every offending column, in schema order
        columns: Vec<String>,
    },

    /// The value cannot be converted to the column's semantic type.
    #[error("Type mismatch for column {column}: expected {expected}, got {given}")]
    TypeMismatch {
        /// Column being set
        column: String,
        /// Semantic type of the column
        expected: SemanticType,
        /// Kind of the value that was given
        given: &'static str,
    },

    /// The operation is not valid in the loader's current state.
    #[error("Cannot {operation} while loader is {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the loader was in
        state: LoaderState,
    },

    /// Failure reported by the schema catalog, SQL executor or constraint directory.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl LoaderError {
    /// Attaches the column name to a validator failure.
    pub(crate) fn from_validation(column: &str, error: ValidationError) -> Self {
        match error {
            ValidationError::NullNotAllowed => LoaderError::NullNotAllowed {
                columns: vec![column.to_string()],
            },
            ValidationError::TypeMismatch { expected, given } => LoaderError::TypeMismatch {
                column: column.to_string(),
                expected,
                given,
            },
        }
    }

    /// Returns true for errors caused by the data handed to the loader, as
    /// opposed to configuration, state or I/O failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoaderError::UnknownColumn { .. }
                | LoaderError::NullNotAllowed { .. }
                | LoaderError::TypeMismatch { .. }
        )
    }
}
