//! Column validation.
//!
//! A value is accepted for a column when it is non-null (or the column allows
//! null) and it converts safely to the column's semantic type. Conversions
//! are an explicit table, one function per semantic type; anything not
//! listed is a mismatch. The converted value is what gets bound at flush.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::types::{ColumnInfo, SemanticType};
use super::value::Value;

/// Largest integer magnitude an f64 represents exactly (2^53).
const MAX_EXACT_FLOAT_INT: u64 = 1 << 53;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const TEXT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Why a value was rejected for a column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("null value not allowed")]
    NullNotAllowed,

    #[error("expected {expected}, got {given}")]
    TypeMismatch {
        expected: SemanticType,
        given: &'static str,
    },
}

/// Validates `value` against `column` and returns the value converted to the
/// column's semantic type.
///
/// The null check runs before the type check.
pub fn validate(value: Value, column: &ColumnInfo) -> Result<Value, ValidationError> {
    if value.is_null() {
        return if column.allow_null {
            Ok(Value::Null)
        } else {
            Err(ValidationError::NullNotAllowed)
        };
    }

    let given = value.kind();
    convert(value, column.semantic_type).ok_or(ValidationError::TypeMismatch {
        expected: column.semantic_type,
        given,
    })
}

/// Converts a non-null value to `target`, or `None` if the conversion table has no entry.
pub fn convert(value: Value, target: SemanticType) -> Option<Value> {
    match target {
        SemanticType::Integer => to_integer(value),
        SemanticType::Decimal => to_decimal(value),
        SemanticType::Text => to_text(value),
        SemanticType::DateTime => to_datetime(value),
        SemanticType::Boolean => to_boolean(value),
        SemanticType::Binary => to_binary(value),
    }
}

fn to_integer(value: Value) -> Option<Value> {
    match value {
        Value::Int(i) => Some(Value::Int(i)),
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        Value::Float(f)
            if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            Some(Value::Int(f as i64))
        }
        Value::Bool(b) => Some(Value::Int(i64::from(b))),
        Value::Text(s) => s.trim().parse::<i64>().ok().map(Value::Int),
        _ => None,
    }
}

fn to_decimal(value: Value) -> Option<Value> {
    match value {
        Value::Float(f) if f.is_finite() => Some(Value::Float(f)),
        Value::Int(i) if i.unsigned_abs() <= MAX_EXACT_FLOAT_INT => Some(Value::Float(i as f64)),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        _ => None,
    }
}

fn to_text(value: Value) -> Option<Value> {
    let text = match value {
        Value::Text(s) => s,
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        Value::DateTime(dt) => dt.format(TEXT_DATETIME_FORMAT).to_string(),
        _ => return None,
    };
    Some(Value::Text(text))
}

fn to_datetime(value: Value) -> Option<Value> {
    match value {
        Value::DateTime(dt) => Some(Value::DateTime(dt)),
        Value::Date(d) => Some(Value::DateTime(d.and_time(NaiveTime::MIN))),
        Value::Text(s) => parse_datetime(s.trim()).map(Value::DateTime),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn to_boolean(value: Value) -> Option<Value> {
    match value {
        Value::Bool(b) => Some(Value::Bool(b)),
        Value::Int(0) => Some(Value::Bool(false)),
        Value::Int(1) => Some(Value::Bool(true)),
        Value::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn to_binary(value: Value) -> Option<Value> {
    match value {
        Value::Bytes(b) => Some(Value::Bytes(b)),
        Value::Text(s) => Some(Value::Bytes(s.into_bytes())),
        _ => None,
    }
}
