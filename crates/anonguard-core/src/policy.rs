//! Anonymization policy: the caller-supplied configuration of a run.
//!
//! A policy is a plain value passed to the engine. Nothing here is global,
//! so several policies can be used side by side in one process.

use std::collections::HashSet;

use crate::{
    errors::AnonymizationError,
    rules::{round::MAX_DECIMALS, GeneralizationRule},
};

/// A generalization rule bound to its target column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGeneralization {
    column: String,
    rule: GeneralizationRule,
    supersedes: Vec<String>,
}

impl ColumnGeneralization {
    pub fn new(column: &str, rule: GeneralizationRule) -> Self {
        Self {
            column: column.to_string(),
            rule,
            supersedes: Vec::new(),
        }
    }

    /// Columns made redundant by this rule, dropped whenever the rule applies.
    pub fn superseding(self, columns: Vec<String>) -> Self {
        Self {
            supersedes: columns,
            ..self
        }
    }

    pub fn column(&self) -> &str {
        self.column.as_str()
    }

    pub fn rule(&self) -> &GeneralizationRule {
        &self.rule
    }

    pub fn supersedes(&self) -> &[String] {
        self.supersedes.as_slice()
    }

    /// Check the rule parameters: non-zero length, non-empty unknown token,
    /// supported decimals, no self-supersede.
    pub(crate) fn validate(&self) -> Result<(), AnonymizationError> {
        let invalid = |message: &str| AnonymizationError::InvalidRule {
            rule: self.rule.name().to_string(),
            column: self.column.clone(),
            message: message.to_string(),
        };
        match &self.rule {
            GeneralizationRule::Truncate {
                length, unknown, ..
            } => {
                if *length == 0 {
                    return Err(invalid("length must be at least 1"));
                }
                if unknown.is_empty() {
                    return Err(invalid("unknown token must not be empty"));
                }
            }
            GeneralizationRule::Round { decimals } => {
                if *decimals > MAX_DECIMALS {
                    return Err(invalid(&format!(
                        "at most {} decimal places are supported",
                        MAX_DECIMALS
                    )));
                }
            }
        }
        if self.supersedes.iter().any(|c| c == &self.column) {
            return Err(invalid("a rule cannot supersede its own column"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnonymizationPolicy {
    k: usize,
    quasi_identifiers: Vec<String>,
    drop_columns: Vec<String>,
    generalizations: Vec<ColumnGeneralization>,
    strict: bool,
}

impl AnonymizationPolicy {
    pub fn builder(k: usize) -> PolicyBuilder {
        PolicyBuilder::new(k)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn quasi_identifiers(&self) -> &[String] {
        self.quasi_identifiers.as_slice()
    }

    /// Explicit identifiers removed before generalization.
    pub fn drop_columns(&self) -> &[String] {
        self.drop_columns.as_slice()
    }

    pub fn generalizations(&self) -> &[ColumnGeneralization] {
        self.generalizations.as_slice()
    }

    /// In strict mode every quasi-identifier must be present in the table.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Check the policy on its own, before it meets a table.
    pub fn validate(&self) -> Result<(), AnonymizationError> {
        if self.k < 2 {
            return Err(AnonymizationError::InvalidThreshold(self.k));
        }
        if self.quasi_identifiers.is_empty() {
            return Err(AnonymizationError::EmptyQuasiIdentifiers);
        }
        let mut seen = HashSet::new();
        for qi in &self.quasi_identifiers {
            if !seen.insert(qi.as_str()) {
                return Err(AnonymizationError::DuplicateQuasiIdentifier(qi.clone()));
            }
        }

        let mut targets = HashSet::new();
        for generalization in &self.generalizations {
            generalization.validate()?;
            if !targets.insert(generalization.column()) {
                return Err(AnonymizationError::InvalidRule {
                    rule: generalization.rule().name().to_string(),
                    column: generalization.column().to_string(),
                    message: "column already has a generalization rule".to_string(),
                });
            }
            if self.drop_columns.iter().any(|c| c == generalization.column()) {
                return Err(AnonymizationError::InvalidRule {
                    rule: generalization.rule().name().to_string(),
                    column: generalization.column().to_string(),
                    message: "column is also listed for removal".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`AnonymizationPolicy`]
pub struct PolicyBuilder {
    k: usize,
    quasi_identifiers: Vec<String>,
    drop_columns: Vec<String>,
    generalizations: Vec<ColumnGeneralization>,
    strict: bool,
}

impl PolicyBuilder {
    /// Create a new [`PolicyBuilder`] with threshold `k`
    pub fn new(k: usize) -> Self {
        Self {
            k,
            quasi_identifiers: Vec::new(),
            drop_columns: Vec::new(),
            generalizations: Vec::new(),
            strict: false,
        }
    }

    /// Build and validate an [`AnonymizationPolicy`]
    pub fn build(self) -> Result<AnonymizationPolicy, AnonymizationError> {
        let policy = AnonymizationPolicy {
            k: self.k,
            quasi_identifiers: self.quasi_identifiers,
            drop_columns: self.drop_columns,
            generalizations: self.generalizations,
            strict: self.strict,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn with_quasi_identifier(mut self, column: &str) -> Self {
        self.quasi_identifiers.push(column.to_string());
        self
    }

    pub fn with_quasi_identifiers(mut self, columns: Vec<String>) -> Self {
        self.quasi_identifiers.extend(columns);
        self
    }

    pub fn drop_column(mut self, column: &str) -> Self {
        self.drop_columns.push(column.to_string());
        self
    }

    pub fn drop_columns(mut self, columns: Vec<String>) -> Self {
        self.drop_columns.extend(columns);
        self
    }

    pub fn with_generalization(mut self, generalization: ColumnGeneralization) -> Self {
        self.generalizations.push(generalization);
        self
    }

    /// Mask `column` to its first `length` characters
    pub fn truncate(self, column: &str, length: usize) -> Self {
        self.with_generalization(ColumnGeneralization::new(
            column,
            GeneralizationRule::truncate(length),
        ))
    }

    /// Round `column` to `decimals` decimal places
    pub fn round(self, column: &str, decimals: u32) -> Self {
        self.with_generalization(ColumnGeneralization::new(
            column,
            GeneralizationRule::round(decimals),
        ))
    }

    pub fn with_strict(self, strict: bool) -> Self {
        Self { strict, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qis() -> Vec<String> {
        vec!["WARD".to_string(), "ZIP_CODE".to_string()]
    }

    #[test]
    fn test_policy_builder() {
        let policy = AnonymizationPolicy::builder(5)
            .with_quasi_identifiers(qis())
            .drop_column("STREET_ADDRESS")
            .truncate("ZIP_CODE", 3)
            .with_generalization(
                ColumnGeneralization::new("LATITUDE", GeneralizationRule::round(3))
                    .superseding(vec!["Y_COORDINATE".to_string()]),
            )
            .build()
            .unwrap();

        assert_eq!(policy.k(), 5);
        assert_eq!(policy.quasi_identifiers(), qis().as_slice());
        assert_eq!(policy.drop_columns(), ["STREET_ADDRESS".to_string()]);
        assert_eq!(policy.generalizations().len(), 2);
        assert_eq!(policy.generalizations()[1].supersedes(), ["Y_COORDINATE"]);
        assert!(!policy.is_strict());
    }

    #[test]
    fn test_threshold_below_two_rejected() {
        for k in [0, 1] {
            let err = AnonymizationPolicy::builder(k)
                .with_quasi_identifiers(qis())
                .build()
                .unwrap_err();
            assert!(matches!(err, AnonymizationError::InvalidThreshold(v) if v == k));
        }
        assert!(
            AnonymizationPolicy::builder(2)
                .with_quasi_identifiers(qis())
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_empty_quasi_identifiers_rejected() {
        let err = AnonymizationPolicy::builder(5).build().unwrap_err();
        assert!(matches!(err, AnonymizationError::EmptyQuasiIdentifiers));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_duplicate_quasi_identifier_rejected() {
        let err = AnonymizationPolicy::builder(5)
            .with_quasi_identifier("WARD")
            .with_quasi_identifier("WARD")
            .build()
            .unwrap_err();
        assert!(matches!(err, AnonymizationError::DuplicateQuasiIdentifier(c) if c == "WARD"));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let zero_length = AnonymizationPolicy::builder(5)
            .with_quasi_identifiers(qis())
            .truncate("ZIP_CODE", 0)
            .build();
        assert!(matches!(zero_length, Err(AnonymizationError::InvalidRule { .. })));

        let too_precise = AnonymizationPolicy::builder(5)
            .with_quasi_identifiers(qis())
            .round("LATITUDE", 16)
            .build();
        assert!(matches!(too_precise, Err(AnonymizationError::InvalidRule { .. })));

        let twice = AnonymizationPolicy::builder(5)
            .with_quasi_identifiers(qis())
            .truncate("ZIP_CODE", 3)
            .truncate("ZIP_CODE", 2)
            .build();
        assert!(matches!(twice, Err(AnonymizationError::InvalidRule { .. })));

        let dropped = AnonymizationPolicy::builder(5)
            .with_quasi_identifiers(qis())
            .drop_column("LATITUDE")
            .round("LATITUDE", 3)
            .build();
        assert!(matches!(dropped, Err(AnonymizationError::InvalidRule { .. })));

        let self_superseding = AnonymizationPolicy::builder(5)
            .with_quasi_identifiers(qis())
            .with_generalization(
                ColumnGeneralization::new("LATITUDE", GeneralizationRule::round(3))
                    .superseding(vec!["LATITUDE".to_string()]),
            )
            .build();
        assert!(matches!(
            self_superseding,
            Err(AnonymizationError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_strict_flag() {
        let policy = AnonymizationPolicy::builder(3)
            .with_quasi_identifiers(qis())
            .with_strict(true)
            .build()
            .unwrap();
        assert!(policy.is_strict());
    }
}
