use std::{collections::HashSet, sync::Arc};

use arrow::datatypes::{Field, Schema};
use arrow_array::RecordBatch;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    compiler::ExecutableGeneralization, errors::AnonymizationError, policy::AnonymizationPolicy,
};

/// What one generalization rule did to its column.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralizationSummary {
    pub column: String,
    pub rule: String,
    pub method: String,
    /// Rows whose value was missing before the rule ran
    pub missing: usize,
}

/// Outcome of the generalization stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralizationReport {
    pub applied: Vec<GeneralizationSummary>,
    /// Rule columns absent from the table
    pub skipped: Vec<String>,
    pub dropped_columns: Vec<String>,
    pub superseded_columns: Vec<String>,
    pub ignored_quasi_identifiers: Vec<String>,
}

/// Schema-level decisions taken before any row is read.
#[derive(Debug)]
pub struct GeneralizationPlan<'a> {
    applicable: Vec<&'a ExecutableGeneralization>,
    skipped: Vec<String>,
    dropped: Vec<String>,
    superseded: Vec<String>,
    quasi_identifiers: Vec<String>,
    ignored: Vec<String>,
}

impl<'a> GeneralizationPlan<'a> {
    /// Resolve `policy` and its compiled `rules` against `schema`.
    ///
    /// # Errors
    ///
    /// - `MissingColumn` in strict mode when a quasi-identifier will not be in
    ///   the generalized table
    /// - `NoQuasiIdentifierPresent` when none of them will be
    pub fn new(
        schema: &Schema,
        policy: &AnonymizationPolicy,
        rules: &'a [ExecutableGeneralization],
    ) -> Result<Self, AnonymizationError> {
        let present = |name: &str| schema.column_with_name(name).is_some();

        let dropped: Vec<String> = policy
            .drop_columns()
            .iter()
            .filter(|c| present(c.as_str()))
            .cloned()
            .collect();

        let mut superseded: Vec<String> = Vec::new();
        for rule in rules.iter().filter(|r| present(r.column.as_str())) {
            for column in &rule.supersedes {
                if present(column.as_str()) && !dropped.contains(column) && !superseded.contains(column) {
                    superseded.push(column.clone());
                }
            }
        }

        let mut applicable = Vec::new();
        let mut skipped = Vec::new();
        for rule in rules {
            if present(rule.column.as_str()) && !superseded.contains(&rule.column) {
                applicable.push(rule);
            } else {
                skipped.push(rule.column.clone());
            }
        }

        let removed: HashSet<&str> = dropped
            .iter()
            .chain(superseded.iter())
            .map(String::as_str)
            .collect();
        let (quasi_identifiers, ignored): (Vec<String>, Vec<String>) = policy
            .quasi_identifiers()
            .iter()
            .cloned()
            .partition(|qi| present(qi.as_str()) && !removed.contains(qi.as_str()));

        if policy.is_strict() {
            if let Some(first) = ignored.first() {
                return Err(AnonymizationError::MissingColumn(first.clone()));
            }
        }
        if quasi_identifiers.is_empty() {
            return Err(AnonymizationError::NoQuasiIdentifierPresent(
                policy.quasi_identifiers().to_vec(),
            ));
        }

        Ok(Self {
            applicable,
            skipped,
            dropped,
            superseded,
            quasi_identifiers,
            ignored,
        })
    }

    /// Quasi-identifiers that will be grouped on, in policy order.
    pub fn quasi_identifiers(&self) -> &[String] {
        self.quasi_identifiers.as_slice()
    }

    pub fn ignored_quasi_identifiers(&self) -> &[String] {
        self.ignored.as_slice()
    }

    pub fn applicable(&self) -> impl Iterator<Item = &ExecutableGeneralization> + '_ {
        self.applicable.iter().copied()
    }

    pub fn skipped(&self) -> &[String] {
        self.skipped.as_slice()
    }

    pub fn dropped(&self) -> &[String] {
        self.dropped.as_slice()
    }

    pub fn superseded(&self) -> &[String] {
        self.superseded.as_slice()
    }
}

/// Remove `columns` from `table`. Names not in the table are ignored.
pub fn drop_columns(
    table: &RecordBatch,
    columns: &[String],
) -> Result<RecordBatch, AnonymizationError> {
    let keep: Vec<usize> = table
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| !columns.iter().any(|c| c == field.name()))
        .map(|(index, _)| index)
        .collect();
    Ok(table.project(&keep)?)
}

/// Drop identifiers and superseded columns, then apply every applicable rule.
///
/// Rules run in parallel, one column each. Generalized columns replace the
/// originals at the same position.
pub fn generalize(
    table: &RecordBatch,
    plan: &GeneralizationPlan,
) -> Result<(RecordBatch, GeneralizationReport), AnonymizationError> {
    let removed: Vec<String> = plan
        .dropped
        .iter()
        .chain(plan.superseded.iter())
        .cloned()
        .collect();
    let table = drop_columns(table, &removed)?;
    let schema = table.schema();

    let outputs = plan
        .applicable
        .par_iter()
        .map(|generalization| -> Result<_, AnonymizationError> {
            let index = schema
                .index_of(&generalization.column)
                .map_err(|_| AnonymizationError::MissingColumn(generalization.column.clone()))?;
            let output = generalization
                .rule
                .apply(table.column(index), &generalization.column)?;
            Ok((index, *generalization, output))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
    let mut columns = table.columns().to_vec();
    let mut applied = Vec::with_capacity(outputs.len());

    for (index, generalization, output) in outputs {
        let field = &schema.fields()[index];
        let nullable = field.is_nullable() || output.array.null_count() > 0;
        fields[index] = Arc::new(Field::new(
            field.name(),
            output.array.data_type().clone(),
            nullable,
        ));
        columns[index] = output.array;

        let summary = GeneralizationSummary {
            column: generalization.column.clone(),
            rule: generalization.rule.name().to_string(),
            method: generalization.rule.describe(),
            missing: output.missing,
        };
        debug!(
            column = %summary.column,
            rule = %summary.rule,
            method = %summary.method,
            "generalization applied"
        );
        if summary.missing > 0 {
            warn!(
                column = %summary.column,
                rule = %summary.rule,
                rows = summary.missing,
                "missing values under generalization"
            );
        }
        applied.push(summary);
    }

    let generalized = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    let report = GeneralizationReport {
        applied,
        skipped: plan.skipped.clone(),
        dropped_columns: plan.dropped.clone(),
        superseded_columns: plan.superseded.clone(),
        ignored_quasi_identifiers: plan.ignored.clone(),
    };
    Ok((generalized, report))
}
