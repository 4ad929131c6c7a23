//! CSV import.
//!
//! The header row names the target columns. Every other field is handed to
//! the loader as text and converted to the column's type by the validator.
//! Empty fields leave the column unset.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};

use crate::loader::{Connection, Loader};

/// Imports the CSV file at `path` into an open loader.
///
/// Returns the number of rows committed. The loader is left open so the
/// caller decides when to close it.
///
/// # Errors
///
/// Fails on unreadable input, a header naming a column the table does not
/// have, or the first row the loader rejects. Rows committed before the
/// failure stay buffered in the loader.
pub fn import_csv<C: Connection>(
    loader: &mut Loader<C>,
    path: &Path,
    delimiter: u8,
) -> Result<usize> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    import_reader(loader, file, delimiter)
        .with_context(|| format!("Failed to import {}", path.display()))
}

/// Imports CSV data from any reader into an open loader.
pub fn import_reader<C: Connection, R: Read>(
    loader: &mut Loader<C>,
    reader: R,
    delimiter: u8,
) -> Result<usize> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .context("Failed to read CSV header")?
        .clone();
    check_headers(loader, &headers)?;

    let mut rows = 0;
    for (index, record) in reader.records().enumerate() {
        // Line 1 is the header
        let line = index + 2;
        let record = record.with_context(|| format!("Failed to parse CSV line {}", line))?;

        let mut fields_set = 0;
        for (column, field) in headers.iter().zip(record.iter()) {
            if field.is_empty() {
                continue;
            }
            loader
                .set_value(column, field)
                .with_context(|| format!("Line {}, column {}", line, column))?;
            fields_set += 1;
        }
        loader
            .next_row()
            .with_context(|| format!("Line {}", line))?;
        // A line of empty fields becomes an empty row, which is never written
        if fields_set > 0 {
            rows += 1;
        }
    }

    log::info!("Read {} row(s) from CSV input", rows);
    Ok(rows)
}

fn check_headers<C: Connection>(loader: &Loader<C>, headers: &StringRecord) -> Result<()> {
    if headers.is_empty() {
        bail!("CSV input has no header row");
    }

    let unknown: Vec<&str> = headers
        .iter()
        .filter(|h| !loader.columns().iter().any(|c| c.name == *h))
        .collect();
    if !unknown.is_empty() {
        bail!(
            "CSV header names column(s) not in table {}: {}",
            loader.config().table_name,
            unknown.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnInfo, SemanticType, Value};
    use crate::storage::test_helpers::FakeConnection;
    use crate::LoaderConfig;

    fn connection() -> FakeConnection {
        FakeConnection::with_columns(vec![
            ColumnInfo::new("id", SemanticType::Integer, false),
            ColumnInfo::new("name", SemanticType::Text, true),
            ColumnInfo::new("active", SemanticType::Boolean, true),
        ])
    }

    #[test]
    fn test_import_converts_fields() {
        let mut connection = connection();
        let mut loader = Loader::new(&mut connection, LoaderConfig::new("people"));
        loader.open().unwrap();

        let data = "id,name,active\n1,Ada,yes\n2,,false\n";
        assert_eq!(import_reader(&mut loader, data.as_bytes(), b',').unwrap(), 2);
        loader.close().unwrap();
        drop(loader);

        let (_, parameters) = &connection.executor.batches[0];
        assert_eq!(parameters[0].values, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(
            parameters[1].values,
            vec![Value::Text("Ada".to_string()), Value::Null]
        );
        assert_eq!(
            parameters[2].values,
            vec![Value::Bool(true), Value::Bool(false)]
        );
    }

    #[test]
    fn test_import_does_not_count_lines_of_empty_fields() {
        let mut connection = connection();
        let mut loader = Loader::new(&mut connection, LoaderConfig::new("people"));
        loader.open().unwrap();

        let data = "id,name,active\n1,Ada,\n,,\n2,Bob,no\n,,\n";
        assert_eq!(import_reader(&mut loader, data.as_bytes(), b',').unwrap(), 2);
        assert_eq!(loader.buffered_rows(), 2);
        loader.close().unwrap();
        drop(loader);

        let (_, parameters) = &connection.executor.batches[0];
        assert_eq!(parameters[0].values, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_import_rejects_unknown_header() {
        let mut loader = Loader::new(connection(), LoaderConfig::new("people"));
        loader.open().unwrap();

        let err = import_reader(&mut loader, "id,email\n1,a@b\n".as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("email"));
        assert_eq!(loader.buffered_rows(), 0);
    }

    #[test]
    fn test_import_reports_line_of_bad_value() {
        let mut loader = Loader::new(connection(), LoaderConfig::new("people"));
        loader.open().unwrap();

        let err = import_reader(&mut loader, "id;name\n1;x\nabc;y\n".as_bytes(), b';')
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Line 3, column id"));
        assert!(err
            .chain()
            .any(|cause| cause.downcast_ref::<crate::LoaderError>().is_some()));
    }
}
