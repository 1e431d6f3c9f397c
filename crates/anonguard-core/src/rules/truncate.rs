use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow_array::StringArray;
use arrow_string::substring::substring_by_char;

use crate::{
    engine::normalize::normalize_array,
    errors::AnonymizationError,
    rules::{Generalization, Generalized},
};

/// Placeholder for unknown values, non-numeric so it never collides with a short code.
pub const DEFAULT_UNKNOWN_TOKEN: &str = "NAX";

/// Values treated as "unknown" in addition to nulls and empty strings.
pub const DEFAULT_UNKNOWN_MARKERS: [&str; 1] = ["NA"];

/// Prefix masking: keep the first `length` characters of each value.
///
/// Missing, empty and unknown-marker values map to the `unknown` token, as do
/// prefixes that would read as unknown. The token maps to itself, so applying
/// the rule twice changes nothing.
pub struct Truncate {
    length: usize,
    unknown: String,
    markers: Vec<String>,
}

impl Truncate {
    pub fn new(length: usize, unknown: String) -> Self {
        Self {
            length,
            unknown,
            markers: DEFAULT_UNKNOWN_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    pub fn with_markers(self, markers: Vec<String>) -> Self {
        Self { markers, ..self }
    }

    fn is_unknown(&self, value: &str) -> bool {
        value.is_empty() || value == self.unknown || self.markers.iter().any(|m| m == value)
    }
}

impl Generalization for Truncate {
    fn name(&self) -> &'static str {
        "Truncate"
    }

    fn describe(&self) -> String {
        format!("{}-character prefix mask", self.length)
    }

    fn apply(&self, array: &ArrayRef, column: &str) -> Result<Generalized, AnonymizationError> {
        // Non-text columns (e.g. postal codes read as integers) are masked on their canonical text
        let text: StringArray = normalize_array(array.as_ref(), column)?
            .iter()
            .map(|v| v.as_str())
            .collect();
        let prefixes = substring_by_char(&text, 0, Some(self.length as u64))?;

        // A prefix that reads as unknown ("NAPERVILLE" -> "NA") becomes the token
        // too, otherwise a second pass would change it.
        let mut missing = 0;
        let masked: StringArray = text
            .iter()
            .zip(prefixes.iter())
            .map(|(original, prefix)| match (original, prefix) {
                (Some(original), Some(prefix))
                    if !self.is_unknown(original) && !self.is_unknown(prefix) =>
                {
                    Some(prefix.to_string())
                }
                _ => {
                    missing += 1;
                    Some(self.unknown.clone())
                }
            })
            .collect();

        Ok(Generalized {
            array: Arc::new(masked),
            missing,
        })
    }
}
