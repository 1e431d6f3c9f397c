use anonguard_core::{AnonymizationMetrics, AnonymizationPolicy};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Error;

use crate::Reporter;

#[derive(Serialize, Deserialize)]
pub struct JsonFormatter {
    version: String,
    timestamp: String,
    tables: Vec<TableFormatter>,
}

#[derive(Serialize, Deserialize)]
struct TableFormatter {
    name: String,
    k: usize,
    quasi_identifiers: Vec<String>,
    ignored_quasi_identifiers: Vec<String>,
    before: ShapeFormatter,
    after: ShapeFormatter,
    suppressed_rows: usize,
    suppression_rate: f64,
    equivalence_classes: usize,
    smallest_retained_class: Option<usize>,
    suppressed_classes: Vec<ClassFormatter>,
    generalizations: Vec<GeneralizationFormatter>,
    dropped_columns: Vec<String>,
    superseded_columns: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct ShapeFormatter {
    rows: usize,
    columns: usize,
}

#[derive(Serialize, Deserialize)]
struct ClassFormatter {
    key: Vec<Option<String>>,
    size: usize,
}

#[derive(Serialize, Deserialize)]
struct GeneralizationFormatter {
    column: String,
    rule: String,
    method: String,
    missing: usize,
}

impl JsonFormatter {
    pub fn new(version: String) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            version,
            timestamp,
            tables: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Reporter for JsonFormatter {
    fn on_start(&self) {}

    fn on_loading(&self, _path: &str) {}

    fn on_table_load(&self, _name: &str, _rows: usize, _columns: usize) {}

    fn on_anonymization_start(&self, _policy: &AnonymizationPolicy) {}

    fn on_result(&mut self, table_name: &str, metrics: &AnonymizationMetrics) {
        let suppressed_classes = metrics
            .suppressed_classes()
            .iter()
            .map(|class| ClassFormatter {
                key: class
                    .key
                    .values()
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect(),
                size: class.size,
            })
            .collect();
        let generalizations = metrics
            .generalizations()
            .iter()
            .map(|g| GeneralizationFormatter {
                column: g.column.clone(),
                rule: g.rule.clone(),
                method: g.method.clone(),
                missing: g.missing,
            })
            .collect();

        self.tables.push(TableFormatter {
            name: table_name.to_string(),
            k: metrics.k(),
            quasi_identifiers: metrics.quasi_identifiers().to_vec(),
            ignored_quasi_identifiers: metrics.ignored_quasi_identifiers().to_vec(),
            before: ShapeFormatter {
                rows: metrics.initial_rows(),
                columns: metrics.initial_columns(),
            },
            after: ShapeFormatter {
                rows: metrics.final_rows(),
                columns: metrics.final_columns(),
            },
            suppressed_rows: metrics.suppressed_rows(),
            suppression_rate: metrics.suppression_rate(),
            equivalence_classes: metrics.num_classes(),
            smallest_retained_class: metrics.smallest_retained_class(),
            suppressed_classes,
            generalizations,
            dropped_columns: metrics.dropped_columns().to_vec(),
            superseded_columns: metrics.superseded_columns().to_vec(),
        });
    }

    fn on_output_written(&self, _path: &str) {}
}
