use arrow_array::RecordBatch;

use crate::engine::{
    classes::{EquivalenceClass, EquivalenceClasses},
    generalizer::{GeneralizationReport, GeneralizationSummary},
};

/// Figures describing one anonymization run.
///
/// Built once by [`collect`] from the artifacts of the run and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymizationMetrics {
    k: usize,
    initial_rows: usize,
    initial_columns: usize,
    final_rows: usize,
    final_columns: usize,
    quasi_identifiers: Vec<String>,
    num_classes: usize,
    suppressed_classes: Vec<EquivalenceClass>,
    smallest_retained_class: Option<usize>,
    generalization: GeneralizationReport,
}

impl AnonymizationMetrics {
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn initial_rows(&self) -> usize {
        self.initial_rows
    }

    pub fn initial_columns(&self) -> usize {
        self.initial_columns
    }

    pub fn final_rows(&self) -> usize {
        self.final_rows
    }

    pub fn final_columns(&self) -> usize {
        self.final_columns
    }

    pub fn suppressed_rows(&self) -> usize {
        self.initial_rows - self.final_rows
    }

    /// Share of input rows removed, in percent.
    pub fn suppression_rate(&self) -> f64 {
        if self.initial_rows == 0 {
            return 0.;
        }
        self.suppressed_rows() as f64 * 100. / self.initial_rows as f64
    }

    pub fn quasi_identifiers(&self) -> &[String] {
        self.quasi_identifiers.as_slice()
    }

    pub fn ignored_quasi_identifiers(&self) -> &[String] {
        self.generalization.ignored_quasi_identifiers.as_slice()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn retained_classes(&self) -> usize {
        self.num_classes - self.suppressed_classes.len()
    }

    /// Classes below the threshold, sorted by key.
    pub fn suppressed_classes(&self) -> &[EquivalenceClass] {
        self.suppressed_classes.as_slice()
    }

    pub fn smallest_retained_class(&self) -> Option<usize> {
        self.smallest_retained_class
    }

    pub fn generalizations(&self) -> &[GeneralizationSummary] {
        self.generalization.applied.as_slice()
    }

    /// Rule columns that were not in the table.
    pub fn skipped_generalizations(&self) -> &[String] {
        self.generalization.skipped.as_slice()
    }

    pub fn dropped_columns(&self) -> &[String] {
        self.generalization.dropped_columns.as_slice()
    }

    pub fn superseded_columns(&self) -> &[String] {
        self.generalization.superseded_columns.as_slice()
    }

    /// Dropped and superseded columns together.
    pub fn removed_columns(&self) -> Vec<&str> {
        self.dropped_columns()
            .iter()
            .chain(self.superseded_columns())
            .map(String::as_str)
            .collect()
    }
}

/// Aggregate the artifacts of a run into metrics. Reads nothing else.
pub fn collect(
    before: &RecordBatch,
    after: &RecordBatch,
    classes: &EquivalenceClasses,
    k: usize,
    generalization: GeneralizationReport,
) -> AnonymizationMetrics {
    AnonymizationMetrics {
        k,
        initial_rows: before.num_rows(),
        initial_columns: before.num_columns(),
        final_rows: after.num_rows(),
        final_columns: after.num_columns(),
        quasi_identifiers: classes.quasi_identifiers().to_vec(),
        num_classes: classes.len(),
        suppressed_classes: classes.below(k).cloned().collect(),
        smallest_retained_class: classes.smallest_retained(k),
        generalization,
    }
}
