mod anonymizer;
pub mod classes;
pub mod generalizer;
pub mod normalize;
pub mod suppressor;

#[cfg(test)]
mod tests;

pub use anonymizer::{anonymize, Anonymized, AnonymizationEngine};
pub use classes::{class_sizes, ClassKey, EquivalenceClass, EquivalenceClasses};
pub use generalizer::{
    drop_columns, generalize, GeneralizationPlan, GeneralizationReport, GeneralizationSummary,
};
pub use normalize::QiValue;
pub use suppressor::{suppress, Suppression};
