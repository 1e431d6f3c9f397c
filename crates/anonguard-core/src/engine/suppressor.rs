use arrow::compute::filter_record_batch;
use arrow_array::{RecordBatch, UInt64Array};
use arrow_ord::cmp::gt_eq;

use crate::{engine::classes::EquivalenceClasses, errors::AnonymizationError};

/// Table left after suppression.
#[derive(Debug, Clone)]
pub struct Suppression {
    pub table: RecordBatch,
    pub suppressed_rows: usize,
}

/// Remove every row whose equivalence class has fewer than `k` rows.
///
/// The mask is built over the original row positions and applied with a
/// stable filter, so retained rows keep their input order.
pub fn suppress(
    table: &RecordBatch,
    classes: &EquivalenceClasses,
    k: usize,
) -> Result<Suppression, AnonymizationError> {
    if k < 2 {
        return Err(AnonymizationError::InvalidThreshold(k));
    }
    if classes.num_rows() != table.num_rows() {
        return Err(AnonymizationError::ClassMismatch {
            classes: classes.num_rows(),
            rows: table.num_rows(),
        });
    }

    let sizes = UInt64Array::from_iter_values(classes.row_sizes().map(|size| size as u64));
    let keep = gt_eq(&sizes, &UInt64Array::new_scalar(k as u64))?;
    let retained = filter_record_batch(table, &keep)?;

    Ok(Suppression {
        suppressed_rows: table.num_rows() - retained.num_rows(),
        table: retained,
    })
}
