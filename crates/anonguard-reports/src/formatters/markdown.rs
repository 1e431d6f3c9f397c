use std::fmt::Write;

use anonguard_core::{AnonymizationMetrics, AnonymizationPolicy};

use crate::{utils::numbers::format_thousands, Reporter};

/// De-identification summary written next to the anonymized dataset.
#[derive(Default)]
pub struct MarkdownFormatter {
    sections: Vec<String>,
}

fn or_none(columns: &[String]) -> String {
    if columns.is_empty() {
        "None".to_string()
    } else {
        columns.join(", ")
    }
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn render(table_name: &str, metrics: &AnonymizationMetrics) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "# De-Identification (K-Anonymity) Summary Report\n")?;
        writeln!(
            out,
            "This report summarizes the de-identification applied to `{}` to enforce \
             **K-anonymity** and protect privacy.\n",
            table_name
        )?;
        writeln!(out, "---\n")?;

        writeln!(out, "## K-Anonymity Configuration")?;
        writeln!(out, "- **K-Threshold:** $k={}$", metrics.k())?;
        writeln!(
            out,
            "- **Quasi-Identifiers (QIAs) Used:** {}",
            metrics.quasi_identifiers().join(", ")
        )?;
        if !metrics.ignored_quasi_identifiers().is_empty() {
            writeln!(
                out,
                "- **Quasi-Identifiers Not Found:** {}",
                metrics.ignored_quasi_identifiers().join(", ")
            )?;
        }
        writeln!(out, "\n---\n")?;

        writeln!(out, "## Data Suppression and Retention")?;
        writeln!(
            out,
            "| Metric | Before De-identification | After K-Anonymity |"
        )?;
        writeln!(out, "| :--- | :---: | :---: |")?;
        writeln!(
            out,
            "| **Total Records** | {} | {} |",
            format_thousands(metrics.initial_rows()),
            format_thousands(metrics.final_rows())
        )?;
        writeln!(
            out,
            "| **Records Suppressed** | N/A | {} (Records with group size < $k$) |",
            format_thousands(metrics.suppressed_rows())
        )?;
        writeln!(
            out,
            "| **Shape** | {} rows, {} cols | {} rows, {} cols |",
            metrics.initial_rows(),
            metrics.initial_columns(),
            metrics.final_rows(),
            metrics.final_columns()
        )?;
        writeln!(
            out,
            "| **Equivalence Classes** | {} | {} |",
            format_thousands(metrics.num_classes()),
            format_thousands(metrics.retained_classes())
        )?;
        writeln!(out, "\n---\n")?;

        writeln!(out, "## Generalization and Masking Details")?;
        writeln!(
            out,
            "The following columns were **generalized (masked)** to reduce their precision \
             while retaining analytic utility:"
        )?;
        writeln!(out, "| Column | Generalization Method | Missing Values |")?;
        writeln!(out, "| :--- | :--- | :---: |")?;
        for summary in metrics.generalizations() {
            writeln!(
                out,
                "| {} | {} | {} |",
                summary.column,
                summary.method,
                format_thousands(summary.missing)
            )?;
        }
        writeln!(out)?;

        writeln!(out, "## Columns Removed")?;
        writeln!(
            out,
            "The following columns were **removed entirely** as they were direct or \
             high-precision identifiers:"
        )?;
        writeln!(
            out,
            "- **Explicitly Dropped:** {}",
            or_none(metrics.dropped_columns())
        )?;
        writeln!(
            out,
            "- **Redundant Columns Dropped (after generalization):** {}",
            or_none(metrics.superseded_columns())
        )?;
        Ok(out)
    }

    pub fn to_markdown(&self) -> String {
        self.sections.join("\n")
    }
}

impl Reporter for MarkdownFormatter {
    fn on_start(&self) {}

    fn on_loading(&self, _path: &str) {}

    fn on_table_load(&self, _name: &str, _rows: usize, _columns: usize) {}

    fn on_anonymization_start(&self, _policy: &AnonymizationPolicy) {}

    fn on_result(&mut self, table_name: &str, metrics: &AnonymizationMetrics) {
        // Writing into a String cannot fail
        if let Ok(section) = Self::render(table_name, metrics) {
            self.sections.push(section);
        }
    }

    fn on_output_written(&self, _path: &str) {}
}
