use arrow_array::RecordBatch;

use crate::{columns::ColumnSchema, errors::AnonymizationError};

pub mod csv_table;

/// A source that materializes into one typed Arrow table.
pub trait Table {
    fn name(&self) -> &str;
    /// Declare the semantic type of columns to cast on load.
    fn prepare(&mut self, columns: Vec<ColumnSchema>) -> Result<(), AnonymizationError>;
    /// Read the whole source into a single batch.
    fn load(&self) -> Result<RecordBatch, AnonymizationError>;
}
