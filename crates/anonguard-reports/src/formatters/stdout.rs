use anonguard_core::{AnonymizationMetrics, AnonymizationPolicy};

use crate::{
    utils::numbers::{format_numbers, format_thousands},
    Reporter,
};

/// Suppressed classes listed before the output is cut short.
const MAX_LISTED_CLASSES: usize = 10;

pub struct StdOutFormatter {
    intro: String,
    intro_len: usize,
}

impl StdOutFormatter {
    pub fn new(version: String) -> Self {
        let s = format!("AnonGuard v{} - K-Anonymity Report", version);
        let n = s.len();
        Self {
            intro: s,
            intro_len: n,
        }
    }

    /// Lines describing one run, without printing them.
    pub fn render_result(&self, table_name: &str, metrics: &AnonymizationMetrics) -> Vec<String> {
        let mut lines = vec![format!(
            "\n{} - k={} on {}",
            table_name,
            metrics.k(),
            metrics.quasi_identifiers().join(", ")
        )];
        if !metrics.ignored_quasi_identifiers().is_empty() {
            lines.push(format!(
                "  Ignored (not in table): {}",
                metrics.ignored_quasi_identifiers().join(", ")
            ));
        }

        let rows = [
            ("Records before", format_thousands(metrics.initial_rows())),
            ("Records after", format_thousands(metrics.final_rows())),
            (
                "Records suppressed",
                format!(
                    "{} ({:.2}%)",
                    format_thousands(metrics.suppressed_rows()),
                    metrics.suppression_rate()
                ),
            ),
            (
                "Columns",
                format!("{} -> {}", metrics.initial_columns(), metrics.final_columns()),
            ),
            (
                "Equivalence classes",
                format!(
                    "{} ({} retained)",
                    format_thousands(metrics.num_classes()),
                    format_thousands(metrics.retained_classes())
                ),
            ),
        ];
        let max_len = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in rows {
            let dots = ".".repeat(max_len - label.len() + 4);
            lines.push(format!("  {} {} {}", label, dots, value));
        }

        for summary in metrics.generalizations() {
            let mut line = format!("  Generalized {}: {}", summary.column, summary.method);
            if summary.missing > 0 {
                line.push_str(&format!(" ({} missing)", format_numbers(summary.missing)));
            }
            lines.push(line);
        }
        let removed = metrics.removed_columns();
        if !removed.is_empty() {
            lines.push(format!("  Removed columns: {}", removed.join(", ")));
        }

        let suppressed = metrics.suppressed_classes();
        if !suppressed.is_empty() {
            lines.push("  Suppressed classes:".to_string());
            for class in suppressed.iter().take(MAX_LISTED_CLASSES) {
                lines.push(format!("    {} x{}", class.key, class.size));
            }
            if suppressed.len() > MAX_LISTED_CLASSES {
                lines.push(format!(
                    "    ... and {} more",
                    format_thousands(suppressed.len() - MAX_LISTED_CLASSES)
                ));
            }
        }
        lines
    }
}

impl Reporter for StdOutFormatter {
    fn on_start(&self) {
        println!("{}", self.intro);
        println!("{}", "=".repeat(self.intro_len));
    }

    fn on_loading(&self, path: &str) {
        println!("Loading data from: {}", path);
    }

    fn on_table_load(&self, name: &str, rows: usize, columns: usize) {
        println!(
            "  {} ({} rows, {} cols)",
            name,
            format_numbers(rows),
            columns
        );
    }

    fn on_anonymization_start(&self, policy: &AnonymizationPolicy) {
        println!("\nEnforcing k-anonymity (k={})...", policy.k());
    }

    fn on_result(&mut self, table_name: &str, metrics: &AnonymizationMetrics) {
        for line in self.render_result(table_name, metrics) {
            println!("{}", line);
        }
    }

    fn on_output_written(&self, path: &str) {
        println!("\n{}", "=".repeat(self.intro_len));
        println!("Anonymized dataset saved to: {}", path);
    }
}
