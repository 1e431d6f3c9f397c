use arrow_array::RecordBatch;
use tracing::{debug, info, info_span, warn};

use crate::{
    compiler::{compile_policy, ExecutableGeneralization},
    engine::{
        classes::class_sizes,
        generalizer::{generalize, GeneralizationPlan},
        suppressor::suppress,
    },
    errors::AnonymizationError,
    metrics::{collect, AnonymizationMetrics},
    policy::AnonymizationPolicy,
};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct Anonymized {
    pub table: RecordBatch,
    pub metrics: AnonymizationMetrics,
}

/// AnonymizationEngine - enforces k-anonymity on Arrow tables.
///
/// Holds a validated policy and its compiled rules. The engine keeps no
/// state between runs and can be shared across threads.
pub struct AnonymizationEngine {
    policy: AnonymizationPolicy,
    generalizations: Vec<ExecutableGeneralization>,
}

impl AnonymizationEngine {
    /// Validate and compile `policy`.
    pub fn new(policy: AnonymizationPolicy) -> Result<Self, AnonymizationError> {
        policy.validate()?;
        let generalizations = compile_policy(&policy)?;
        Ok(Self {
            policy,
            generalizations,
        })
    }

    pub fn policy(&self) -> &AnonymizationPolicy {
        &self.policy
    }

    /// Check `schema` against the policy without touching any row.
    pub fn plan(
        &self,
        schema: &arrow::datatypes::Schema,
    ) -> Result<GeneralizationPlan<'_>, AnonymizationError> {
        GeneralizationPlan::new(schema, &self.policy, &self.generalizations)
    }

    /// Generalize, group and suppress `table`.
    ///
    /// The input is left untouched. On error nothing is returned.
    pub fn anonymize(&self, table: &RecordBatch) -> Result<Anonymized, AnonymizationError> {
        let span = info_span!("anonymize", k = self.policy.k());
        let _guard = span.enter();

        let plan = self.plan(&table.schema())?;
        for qi in plan.ignored_quasi_identifiers() {
            warn!(column = %qi, "quasi-identifier not in table, ignored");
        }
        for column in plan.skipped() {
            debug!(column = %column, "generalization column not in table, skipped");
        }

        let (generalized, report) = generalize(table, &plan)?;
        info!(
            rows = generalized.num_rows(),
            columns = generalized.num_columns(),
            dropped = report.dropped_columns.len() + report.superseded_columns.len(),
            "generalization done"
        );

        let classes = class_sizes(&generalized, plan.quasi_identifiers())?;
        info!(
            classes = classes.len(),
            below_k = classes.below(self.policy.k()).count(),
            "equivalence classes built"
        );

        let suppression = suppress(&generalized, &classes, self.policy.k())?;
        info!(
            suppressed = suppression.suppressed_rows,
            retained = suppression.table.num_rows(),
            "suppression done"
        );

        let metrics = collect(table, &suppression.table, &classes, self.policy.k(), report);
        Ok(Anonymized {
            table: suppression.table,
            metrics,
        })
    }
}

/// One-shot helper: compile `policy` and run it over `table`.
pub fn anonymize(
    table: &RecordBatch,
    policy: &AnonymizationPolicy,
) -> Result<Anonymized, AnonymizationError> {
    AnonymizationEngine::new(policy.clone())?.anonymize(table)
}
