//! Configuration types and CLI options.
//!
//! This module defines the loader configuration plus the enums and structs
//! used for command-line argument parsing.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use strum::VariantNames;
use strum_macros::{Display, EnumString, VariantNames as VariantNamesMacro};

use crate::config::constants::{
    DB_PATH, DEFAULT_BUFFER_SIZE, DEFAULT_DISABLE_CONSTRAINTS, TABLE_NAME_PATTERN,
};
use crate::error_handling::LoaderError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, Display, EnumString, VariantNamesMacro)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, Display, EnumString, VariantNamesMacro)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    Plain,
    Json,
}

fn table_name_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TABLE_NAME_PATTERN).expect("static regex is valid"))
}

/// Loader configuration (no CLI dependencies).
///
/// # Examples
///
/// ```
/// use table_loader::LoaderConfig;
///
/// let config = LoaderConfig {
///     buffer_size: 500,
///     ..LoaderConfig::new("orders")
/// };
/// assert!(config.disable_constraints);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Target table, optionally schema-qualified
    pub table_name: String,

    /// Rows buffered before an automatic flush
    pub buffer_size: usize,

    /// Disable constraints referencing the table while the load is open
    pub disable_constraints: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            disable_constraints: DEFAULT_DISABLE_CONSTRAINTS,
        }
    }
}

impl LoaderConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Checks the configuration before a load is opened.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::Configuration` if the table name is empty or not
    /// a plain identifier, or if the buffer size is zero.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.table_name.is_empty() {
            return Err(LoaderError::Configuration(
                "table name is not set".to_string(),
            ));
        }
        if !table_name_regex().is_match(&self.table_name) {
            return Err(LoaderError::Configuration(format!(
                "invalid table name: {:?}",
                self.table_name
            )));
        }
        if self.buffer_size == 0 {
            return Err(LoaderError::Configuration(
                "buffer size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Load people.csv into the people table
/// table_loader people.csv --table people
///
/// # Larger batches, constraints left enabled
/// table_loader people.csv --table people --buffer-size 1000 --keep-constraints
/// ```
#[derive(Debug, StructOpt)]
#[structopt(
    name = "table_loader",
    about = "Bulk-loads a CSV file into a database table."
)]
pub struct Opt {
    /// CSV file to load; the first line holds the column names
    #[structopt(parse(from_os_str))]
    pub file: PathBuf,

    /// Target table
    #[structopt(long)]
    pub table: String,

    /// Database path (SQLite file)
    #[structopt(long, parse(from_os_str), default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Rows buffered per insert round trip
    #[structopt(long, default_value = "100")]
    pub buffer_size: usize,

    /// Leave constraints referencing the table enabled during the load
    #[structopt(long)]
    pub keep_constraints: bool,

    /// Field delimiter (single ASCII character)
    #[structopt(long, default_value = ",")]
    pub delimiter: char,

    /// Log level: error|warn|info|debug|trace
    #[structopt(long, default_value = "info", possible_values = LogLevel::VARIANTS, case_insensitive = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[structopt(long, default_value = "plain", possible_values = LogFormat::VARIANTS, case_insensitive = true)]
    pub log_format: LogFormat,
}

impl Opt {
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            table_name: self.table.clone(),
            buffer_size: self.buffer_size,
            disable_constraints: !self.keep_constraints,
        }
    }
}
