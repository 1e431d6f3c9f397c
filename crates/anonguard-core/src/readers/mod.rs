mod config;
mod reader;

pub use config::{ReaderConfig, ReaderConfigBuilder};
pub use reader::{csv_schema, read_csv, read_parallel, read_sequential};
