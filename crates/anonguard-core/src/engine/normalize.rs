//! Typed normalization of quasi-identifier values.
//!
//! Grouping compares values as text so that `12`, `12.0` and `"12"` land in
//! the same class. Each Arrow type has one conversion, applied once per
//! column before any class is built. Nulls become [`QiValue::Missing`], which
//! is a regular group value.

use std::fmt;

use arrow::array::{Array, AsArray};
use arrow::compute;
use arrow::datatypes::{DataType, Float32Type, Float64Type};
use arrow_array::StringArray;

use crate::errors::AnonymizationError;

/// A quasi-identifier component after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QiValue {
    Missing,
    Value(String),
}

impl QiValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, QiValue::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            QiValue::Missing => None,
            QiValue::Value(v) => Some(v.as_str()),
        }
    }
}

impl fmt::Display for QiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QiValue::Missing => write!(f, "<missing>"),
            QiValue::Value(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for QiValue {
    fn from(value: &str) -> Self {
        QiValue::Value(value.to_string())
    }
}

impl From<Option<&str>> for QiValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(QiValue::Missing, QiValue::from)
    }
}

/// Canonical text of a float: integral values print without a fraction.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn from_strings(array: &StringArray) -> Vec<QiValue> {
    array.iter().map(QiValue::from).collect()
}

/// Normalize one column into comparable values, one per row.
pub fn normalize_array(array: &dyn Array, column: &str) -> Result<Vec<QiValue>, AnonymizationError> {
    match array.data_type() {
        DataType::Utf8 => Ok(from_strings(array.as_string::<i32>())),
        DataType::LargeUtf8 => Ok(array
            .as_string::<i64>()
            .iter()
            .map(QiValue::from)
            .collect()),
        DataType::Float64 => Ok(array
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.map_or(QiValue::Missing, |f| QiValue::Value(format_float(f))))
            .collect()),
        DataType::Float32 => Ok(array
            .as_primitive::<Float32Type>()
            .iter()
            .map(|v| v.map_or(QiValue::Missing, |f| QiValue::Value(format_float(f as f64))))
            .collect()),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Boolean
        | DataType::Date32
        | DataType::Date64 => {
            let text = compute::cast(array, &DataType::Utf8)?;
            Ok(from_strings(text.as_string::<i32>()))
        }
        DataType::Null => Ok(vec![QiValue::Missing; array.len()]),
        other => Err(AnonymizationError::UnsupportedType {
            column: column.to_string(),
            data_type: other.to_string(),
        }),
    }
}
