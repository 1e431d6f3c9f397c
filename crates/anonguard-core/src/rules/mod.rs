pub mod round;
pub mod truncate;

use arrow::array::ArrayRef;

use crate::errors::AnonymizationError;

pub use round::Round;
pub use truncate::{Truncate, DEFAULT_UNKNOWN_MARKERS, DEFAULT_UNKNOWN_TOKEN};

/// Declarative precision-reduction rule, as written in a policy.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneralizationRule {
    /// Keep the first `length` characters; `markers` and missing values become `unknown`
    Truncate {
        length: usize,
        unknown: String,
        markers: Vec<String>,
    },
    /// Round half to even at `decimals` decimal places
    Round { decimals: u32 },
}

impl GeneralizationRule {
    pub fn name(&self) -> &'static str {
        match self {
            GeneralizationRule::Truncate { .. } => "Truncate",
            GeneralizationRule::Round { .. } => "Round",
        }
    }

    /// Prefix mask with the default unknown token and markers.
    pub fn truncate(length: usize) -> Self {
        GeneralizationRule::Truncate {
            length,
            unknown: DEFAULT_UNKNOWN_TOKEN.to_string(),
            markers: DEFAULT_UNKNOWN_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    pub fn round(decimals: u32) -> Self {
        GeneralizationRule::Round { decimals }
    }
}

/// Output of a generalization over one column.
#[derive(Debug)]
pub struct Generalized {
    pub array: ArrayRef,
    /// Rows left missing or mapped to an unknown placeholder
    pub missing: usize,
}

/// A compiled rule that can run over an Arrow column.
pub trait Generalization: Send + Sync {
    /// Returns the name of the rule.
    fn name(&self) -> &'static str;
    /// Human-readable description used in reports.
    fn describe(&self) -> String;
    /// Generalize every value of `array`.
    fn apply(&self, array: &ArrayRef, column: &str) -> Result<Generalized, AnonymizationError>;
}
