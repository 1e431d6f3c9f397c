pub mod formatters;
pub mod utils;

use anonguard_core::{AnonymizationMetrics, AnonymizationPolicy};
pub use formatters::{json::JsonFormatter, markdown::MarkdownFormatter, stdout::StdOutFormatter};

pub trait Reporter {
    fn on_start(&self);
    fn on_loading(&self, path: &str);
    fn on_table_load(&self, name: &str, rows: usize, columns: usize);
    fn on_anonymization_start(&self, policy: &AnonymizationPolicy);
    fn on_result(&mut self, table_name: &str, metrics: &AnonymizationMetrics);
    fn on_output_written(&self, path: &str);
}
