//! SQLite declared-type mapping.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::SemanticType;

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(\s*(\d+)").expect("static regex is valid"))
}

/// Maps a declared column type to a semantic type.
///
/// Follows SQLite's affinity rules (INT, then CHAR/CLOB/TEXT, then BLOB or
/// no type, then REAL/FLOA/DOUB, otherwise NUMERIC), with two additions
/// checked first: BOOL maps to boolean, DATE/TIME to date-time.
pub(crate) fn semantic_type_for(declared: &str) -> SemanticType {
    let upper = declared.to_uppercase();
    if upper.contains("BOOL") {
        SemanticType::Boolean
    } else if upper.contains("DATE") || upper.contains("TIME") {
        SemanticType::DateTime
    } else if upper.contains("INT") {
        SemanticType::Integer
    } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
        SemanticType::Text
    } else if upper.contains("BLOB") || upper.trim().is_empty() {
        SemanticType::Binary
    } else {
        SemanticType::Decimal
    }
}

/// Length or precision from a declared type such as `VARCHAR(20)` or
/// `DECIMAL(10, 2)`; 0 when none is declared.
pub(crate) fn declared_size(declared: &str) -> usize {
    size_pattern()
        .captures(declared)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
