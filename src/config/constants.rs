//! Configuration constants.
//!
//! Defaults shared by the library configuration and the CLI.

/// Rows buffered before an automatic flush.
/// Larger buffers trade memory and statement size for fewer round trips.
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// Whether constraints referencing the target table are disabled during a load.
pub const DEFAULT_DISABLE_CONSTRAINTS: bool = true;

pub const DB_PATH: &str = "./table_loader.db";

/// Plain or schema-qualified SQL identifier accepted as a table name.
/// The name is spliced into statement text, so nothing else is allowed.
pub const TABLE_NAME_PATTERN: &str =
    r"^[A-Za-z_][A-Za-z0-9_$#]*(\.[A-Za-z_][A-Za-z0-9_$#]*)?$";
