use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::WriterBuilder;
use arrow::datatypes::{Field, Schema};
use arrow_array::RecordBatch;
use tracing::{debug, info};

use crate::columns::ColumnSchema;
use crate::errors::AnonymizationError;
use crate::readers::{read_csv, ReaderConfig};
use crate::tables::Table;

#[derive(Debug)]
pub struct CsvTable {
    path: PathBuf,
    table_name: String,
    columns: Box<[ColumnSchema]>,
    config: ReaderConfig,
}

impl CsvTable {
    pub fn new(path: impl Into<PathBuf>, table_name: String) -> Self {
        Self {
            path: path.into(),
            table_name,
            columns: Box::new([]),
            config: ReaderConfig::default(),
        }
    }

    pub fn with_reader_config(self, config: ReaderConfig) -> Self {
        Self { config, ..self }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn load_error(&self, source: std::io::Error) -> AnonymizationError {
        AnonymizationError::LoadError {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl Table for CsvTable {
    fn name(&self) -> &str {
        self.table_name.as_str()
    }

    /// Register column types. A column may only be declared once.
    fn prepare(&mut self, columns: Vec<ColumnSchema>) -> Result<(), AnonymizationError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name().to_string()) {
                return Err(AnonymizationError::DuplicateColumn(
                    column.name().to_string(),
                ));
            }
        }
        self.columns = columns.into_boxed_slice();
        Ok(())
    }

    /// Read the CSV as text, concatenate it and cast declared columns.
    fn load(&self) -> Result<RecordBatch, AnonymizationError> {
        let (schema, batches) =
            read_csv(&self.path, &self.config).map_err(|e| self.load_error(e))?;
        let table = concat_batches(&schema, &batches)?;
        debug!(
            table = %self.table_name,
            batches = batches.len(),
            rows = table.num_rows(),
            "CSV read"
        );
        drop(batches);

        let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
        let mut arrays = table.columns().to_vec();
        for column in self.columns.iter() {
            let index = schema
                .index_of(column.name())
                .map_err(|_| AnonymizationError::MissingColumn(column.name().to_string()))?;
            let casted = column.cast(&arrays[index])?;
            fields[index] = Arc::new(Field::new(
                column.name(),
                casted.data_type().clone(),
                column.column_type().is_nullable(),
            ));
            arrays[index] = casted;
        }

        let table = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        info!(
            table = %self.table_name,
            rows = table.num_rows(),
            columns = table.num_columns(),
            "table loaded"
        );
        Ok(table)
    }
}

/// Write `table` as CSV with a header, creating parent directories.
pub fn write_csv(table: &RecordBatch, path: &Path) -> Result<(), AnonymizationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(table)?;
    info!(path = %path.display(), rows = table.num_rows(), "table written");
    Ok(())
}
