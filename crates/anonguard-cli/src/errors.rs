use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Input file not found: '{path}'")]
    FileNotFound { path: String },
    #[error("Unknown rule '{rule}' for column '{column}'. Supported: truncate, round")]
    UnknownRule { rule: String, column: String },
    #[error("Rule '{rule}' for column '{column}' requires '{parameter}'")]
    MissingParameter {
        rule: String,
        column: String,
        parameter: String,
    },
    #[error(
        "Unknown datatype '{datatype}' for column '{column}'. Supported: string, nullable_string, integer, float, date"
    )]
    UnknownDatatype { datatype: String, column: String },
    #[error("Column '{column}': 'format' is only valid for date columns")]
    UnexpectedFormat { column: String },
}
