use thiserror::Error;

/// Errors raised while loading, configuring or anonymizing a table.
///
/// Configuration errors are detected before any row is processed. Schema
/// errors abort the run that hit them. Neither leaves partial output behind.
#[derive(Error, Debug)]
pub enum AnonymizationError {
    /// No quasi-identifier was configured
    #[error("Quasi-identifier set is empty")]
    EmptyQuasiIdentifiers,

    #[error("Quasi-identifier '{0}' is listed more than once")]
    DuplicateQuasiIdentifier(String),

    /// k must be at least 2 for the guarantee to mean anything
    #[error("Invalid k-anonymity threshold {0}: k must be at least 2")]
    InvalidThreshold(usize),

    /// After dropping and generalizing, none of the quasi-identifiers is left in the table
    #[error("No valid quasi-identifier found in table (configured: {})", .0.join(", "))]
    NoQuasiIdentifierPresent(Vec<String>),

    #[error("Column '{0}' declared more than once")]
    DuplicateColumn(String),

    /// A column required by the policy is absent
    #[error("Column '{0}' not found in table")]
    MissingColumn(String),

    #[error("Invalid generalization rule '{rule}' for column '{column}': {message}")]
    InvalidRule {
        rule: String,
        column: String,
        message: String,
    },

    /// A value cannot be interpreted the way a rule or column type requires
    #[error("Column '{column}': value '{value}' at row {row} rejected by {rule}")]
    SchemaError {
        column: String,
        rule: String,
        row: usize,
        value: String,
    },

    #[error("Column '{column}' has type {data_type} which cannot be normalized for grouping")]
    UnsupportedType { column: String, data_type: String },

    #[error("Equivalence classes cover {classes} rows but table has {rows}")]
    ClassMismatch { classes: usize, rows: usize },

    #[error("Failed to load '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The Arrow kernel produced an error (e.g., unsupported cast)
    #[error("Arrow computation error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnonymizationError {
    /// True for errors caused by the policy rather than by the data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AnonymizationError::EmptyQuasiIdentifiers
                | AnonymizationError::DuplicateQuasiIdentifier(_)
                | AnonymizationError::InvalidThreshold(_)
                | AnonymizationError::NoQuasiIdentifierPresent(_)
                | AnonymizationError::MissingColumn(_)
                | AnonymizationError::DuplicateColumn(_)
                | AnonymizationError::InvalidRule { .. }
        )
    }

    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            AnonymizationError::SchemaError { .. } | AnonymizationError::UnsupportedType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(AnonymizationError::InvalidThreshold(1).is_configuration_error());
        assert!(AnonymizationError::EmptyQuasiIdentifiers.is_configuration_error());
        let schema = AnonymizationError::SchemaError {
            column: "LATITUDE".to_string(),
            rule: "Round".to_string(),
            row: 4,
            value: "north".to_string(),
        };
        assert!(schema.is_schema_error());
        assert!(!schema.is_configuration_error());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = AnonymizationError::SchemaError {
            column: "LATITUDE".to_string(),
            rule: "Round".to_string(),
            row: 4,
            value: "north".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("LATITUDE"));
        assert!(msg.contains("north"));
        assert!(msg.contains("row 4"));

        let err = AnonymizationError::NoQuasiIdentifierPresent(vec![
            "WARD".to_string(),
            "ZIP_CODE".to_string(),
        ]);
        assert!(err.to_string().contains("WARD, ZIP_CODE"));
    }
}
