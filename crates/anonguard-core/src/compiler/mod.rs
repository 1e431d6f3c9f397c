//! Rule compilation module.
//!
//! Converts the declarative `ColumnGeneralization` entries of a policy into
//! `ExecutableGeneralization`s holding trait objects ready to run over Arrow
//! columns.

#[cfg(test)]
mod tests;

use crate::{
    errors::AnonymizationError,
    policy::{AnonymizationPolicy, ColumnGeneralization},
    rules::{Generalization, GeneralizationRule, Round, Truncate},
};

/// A generalization rule compiled for one target column.
pub struct ExecutableGeneralization {
    pub column: String,
    pub rule: Box<dyn Generalization>,
    pub supersedes: Vec<String>,
}

impl std::fmt::Debug for ExecutableGeneralization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutableGeneralization")
            .field("column", &self.column)
            .field("rule", &self.rule.name())
            .field("supersedes", &self.supersedes)
            .finish()
    }
}

/// Compile a single column generalization.
///
/// # Errors
///
/// Returns `AnonymizationError::InvalidRule` if the rule parameters cannot
/// produce a working generalization (zero-length truncation, empty unknown
/// token, too many decimals).
pub fn compile_generalization(
    generalization: &ColumnGeneralization,
) -> Result<ExecutableGeneralization, AnonymizationError> {
    generalization.validate()?;

    let rule: Box<dyn Generalization> = match generalization.rule() {
        GeneralizationRule::Truncate {
            length,
            unknown,
            markers,
        } => Box::new(Truncate::new(*length, unknown.clone()).with_markers(markers.clone())),
        GeneralizationRule::Round { decimals } => Box::new(Round::new(*decimals)),
    };

    Ok(ExecutableGeneralization {
        column: generalization.column().to_string(),
        rule,
        supersedes: generalization.supersedes().to_vec(),
    })
}

/// Compile every generalization of `policy`, keeping policy order.
pub fn compile_policy(
    policy: &AnonymizationPolicy,
) -> Result<Vec<ExecutableGeneralization>, AnonymizationError> {
    policy
        .generalizations()
        .iter()
        .map(compile_generalization)
        .collect()
}
