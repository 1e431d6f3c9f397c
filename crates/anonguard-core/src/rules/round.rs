use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute;
use arrow::datatypes::{DataType, Float64Type};
use arrow_array::Float64Array;

use crate::{
    errors::AnonymizationError,
    rules::{Generalization, Generalized},
    utils::cast::{blank_as_null, display_value, first_lost_value},
};

/// Largest supported precision; f64 cannot represent more decimals reliably.
pub const MAX_DECIMALS: u32 = 15;

/// Coordinate rounding to a fixed number of decimal places.
///
/// Ties round to even. Missing values stay missing.
pub struct Round {
    decimals: u32,
    scale: f64,
}

impl Round {
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals,
            scale: 10f64.powi(decimals as i32),
        }
    }

    pub fn round(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let scaled = value * self.scale;
        if !scaled.is_finite() {
            return value;
        }
        scaled.round_ties_even() / self.scale
    }
}

impl Generalization for Round {
    fn name(&self) -> &'static str {
        "Round"
    }

    fn describe(&self) -> String {
        format!("Rounded to {} decimal places", self.decimals)
    }

    fn apply(&self, array: &ArrayRef, column: &str) -> Result<Generalized, AnonymizationError> {
        let array = blank_as_null(array)?;
        let numbers = compute::cast(&array, &DataType::Float64)?;
        if let Some(row) = first_lost_value(array.as_ref(), numbers.as_ref()) {
            return Err(AnonymizationError::SchemaError {
                column: column.to_string(),
                rule: self.name().to_string(),
                row,
                value: display_value(array.as_ref(), row),
            });
        }

        let numbers = numbers.as_primitive::<Float64Type>();
        let rounded: Float64Array = numbers.unary(|v| self.round(v));

        Ok(Generalized {
            missing: numbers.null_count(),
            array: Arc::new(rounded),
        })
    }
}
