//! Declared column schema for loaded tables.
//!
//! CSV input is read as text. Columns declared here are cast to their
//! semantic type before the table reaches the engine; undeclared columns stay
//! nullable strings.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute;
use arrow::datatypes::DataType;


use crate::{
    errors::AnonymizationError,
    utils::{
        cast::{blank_as_null, display_value, first_lost_value},
        date_parser::{parse_date_column, DEFAULT_DATE_FORMAT},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    /// Text that must be present on every row
    String,
    NullableString,
    Integer,
    Float,
    /// Calendar date parsed with a chrono format string
    Date { format: String },
}

impl ColumnType {
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnType::String | ColumnType::NullableString => DataType::Utf8,
            ColumnType::Integer => DataType::Int64,
            ColumnType::Float => DataType::Float64,
            ColumnType::Date { .. } => DataType::Date32,
        }
    }

    pub fn is_nullable(&self) -> bool {
        !matches!(self, ColumnType::String)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::NullableString => "nullable_string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Date { .. } => "date",
        }
    }
}

impl TryFrom<&str> for ColumnType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "string" | "str" => Ok(ColumnType::String),
            "nullable_string" | "nullable-string" => Ok(ColumnType::NullableString),
            "integer" | "int" => Ok(ColumnType::Integer),
            "float" | "double" => Ok(ColumnType::Float),
            "date" => Ok(ColumnType::Date {
                format: DEFAULT_DATE_FORMAT.to_string(),
            }),
            _ => Err(value.to_string()),
        }
    }
}

/// A column name with its declared semantic type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    name: String,
    column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: String, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name.to_string(), ColumnType::String)
    }

    pub fn nullable_string(name: &str) -> Self {
        Self::new(name.to_string(), ColumnType::NullableString)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name.to_string(), ColumnType::Integer)
    }

    pub fn float(name: &str) -> Self {
        Self::new(name.to_string(), ColumnType::Float)
    }

    pub fn date(name: &str, format: &str) -> Self {
        Self::new(
            name.to_string(),
            ColumnType::Date {
                format: format.to_string(),
            },
        )
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// Cast a text column to the declared type.
    ///
    /// A present value that does not parse, or a missing value in a
    /// non-nullable column, is reported with its row.
    pub fn cast(&self, array: &ArrayRef) -> Result<ArrayRef, AnonymizationError> {
        let array = match &self.column_type {
            ColumnType::String | ColumnType::NullableString => array.clone(),
            _ => blank_as_null(array)?,
        };
        let casted: ArrayRef = match &self.column_type {
            ColumnType::Date { format } => {
                let text = compute::cast(&array, &DataType::Utf8)?;
                Arc::new(parse_date_column(text.as_string::<i32>(), format))
            }
            other => compute::cast(&array, &other.data_type())?,
        };

        if let Some(row) = first_lost_value(array.as_ref(), casted.as_ref()) {
            return Err(AnonymizationError::SchemaError {
                column: self.name.clone(),
                rule: format!("TypeCheck({})", self.column_type.name()),
                row,
                value: display_value(array.as_ref(), row),
            });
        }
        if self.column_type.is_nullable() {
            return Ok(casted);
        }
        if let Some(row) = (0..casted.len()).find(|&i| casted.is_null(i)) {
            return Err(AnonymizationError::SchemaError {
                column: self.name.clone(),
                rule: "NotNull".to_string(),
                row,
                value: "<missing>".to_string(),
            });
        }
        Ok(casted)
    }
}
