use arrow::array::{Array, ArrayRef};
use arrow::compute::nullif;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::util::display::array_value_to_string;
use arrow_array::StringArray;
use arrow_ord::cmp::eq;

/// Turn empty strings into nulls; other arrays are returned as is.
pub fn blank_as_null(array: &ArrayRef) -> Result<ArrayRef, ArrowError> {
    match array.data_type() {
        DataType::Utf8 => {
            let blank = eq(array, &StringArray::new_scalar(""))?;
            nullif(array.as_ref(), &blank)
        }
        _ => Ok(array.clone()),
    }
}

/// Row of the first value that was present in `original` but became null in `converted`.
///
/// Arrow's safe casts turn unparseable values into nulls, this finds the culprit.
pub fn first_lost_value(original: &dyn Array, converted: &dyn Array) -> Option<usize> {
    if converted.null_count() <= original.null_count() {
        return None;
    }
    (0..original.len()).find(|&i| original.is_valid(i) && converted.is_null(i))
}

/// Render a single value for error messages.
pub fn display_value(array: &dyn Array, row: usize) -> String {
    array_value_to_string(array, row).unwrap_or_else(|_| "<unprintable>".to_string())
}
