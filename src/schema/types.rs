//! Column metadata and the schema catalog interface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error_handling::DatabaseError;

/// Logical value type a column expects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Integer,
    Decimal,
    Text,
    DateTime,
    Boolean,
    Binary,
}

/// Metadata of one writable column of the target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name, unique within the table
    pub name: String,
    /// Logical type values are converted to
    pub semantic_type: SemanticType,
    /// Whether the column accepts null
    pub allow_null: bool,
    /// Driver-specific type tag used when binding parameters
    pub provider_type: String,
    /// Maximum length or precision, 0 when unknown
    pub size: usize,
}

impl ColumnInfo {
    /// Creates column metadata whose provider type mirrors the semantic type.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType, allow_null: bool) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            allow_null,
            provider_type: semantic_type.to_string().to_uppercase(),
            size: 0,
        }
    }

    pub fn with_provider_type(mut self, provider_type: impl Into<String>, size: usize) -> Self {
        self.provider_type = provider_type.into();
        self.size = size;
        self
    }
}

/// A column as reported by the catalog, before read-only columns are filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub column: ColumnInfo,
    /// False for computed, generated or otherwise read-only columns
    pub is_writable: bool,
}

impl CatalogColumn {
    pub fn writable(column: ColumnInfo) -> Self {
        Self {
            column,
            is_writable: true,
        }
    }

    pub fn read_only(column: ColumnInfo) -> Self {
        Self {
            column,
            is_writable: false,
        }
    }
}

/// Source of table metadata.
///
/// Implementations return the table's columns in declaration order; that
/// order becomes the insert column order.
pub trait SchemaCatalog {
    fn columns(&mut self, table: &str) -> Result<Vec<CatalogColumn>, DatabaseError>;
}

impl<T: SchemaCatalog + ?Sized> SchemaCatalog for &mut T {
    fn columns(&mut self, table: &str) -> Result<Vec<CatalogColumn>, DatabaseError> {
        (**self).columns(table)
    }
}

/// The writable columns of one table, with name lookup.
#[derive(Debug, Clone)]
pub struct TableSchema {
    table: String,
    columns: Vec<ColumnInfo>,
    positions: HashMap<String, usize>,
}

impl TableSchema {
    /// Keeps the writable catalog columns, in catalog order.
    pub fn from_catalog(table: &str, catalog_columns: Vec<CatalogColumn>) -> Self {
        let columns: Vec<ColumnInfo> = catalog_columns
            .into_iter()
            .filter(|c| c.is_writable)
            .map(|c| c.column)
            .collect();
        let positions = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self {
            table: table.to_string(),
            columns,
            positions,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Ordinal and metadata of the column with exactly this name.
    pub fn lookup(&self, name: &str) -> Option<(usize, &ColumnInfo)> {
        self.positions
            .get(name)
            .map(|&position| (position, &self.columns[position]))
    }
}
