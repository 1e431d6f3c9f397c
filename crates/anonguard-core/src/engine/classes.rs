use std::fmt;

use arrow_array::RecordBatch;
use rayon::prelude::*;

use crate::{
    engine::normalize::{normalize_array, QiValue},
    errors::AnonymizationError,
    utils::hasher::{xxh3_map, Xxh3Map},
};

/// Tuple of normalized quasi-identifier values, in quasi-identifier order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassKey(Box<[QiValue]>);

impl ClassKey {
    pub fn new(values: Vec<QiValue>) -> Self {
        Self(values.into_boxed_slice())
    }

    pub fn values(&self) -> &[QiValue] {
        &self.0
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClass {
    pub key: ClassKey,
    pub size: usize,
}

/// Partition of a table by quasi-identifier tuple.
///
/// Classes are sorted by key. `row_classes[i]` is the index of the class
/// row `i` belongs to.
#[derive(Debug, Clone)]
pub struct EquivalenceClasses {
    quasi_identifiers: Vec<String>,
    classes: Vec<EquivalenceClass>,
    row_classes: Vec<usize>,
}

impl EquivalenceClasses {
    pub fn quasi_identifiers(&self) -> &[String] {
        self.quasi_identifiers.as_slice()
    }

    pub fn classes(&self) -> &[EquivalenceClass] {
        self.classes.as_slice()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn num_rows(&self) -> usize {
        self.row_classes.len()
    }

    /// Class of the row at position `row`.
    pub fn class_of(&self, row: usize) -> Option<&EquivalenceClass> {
        self.row_classes.get(row).map(|&index| &self.classes[index])
    }

    /// Size of each row's class, in row order.
    pub fn row_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.row_classes
            .iter()
            .map(move |&index| self.classes[index].size)
    }

    /// Classes that fail the threshold, in key order.
    pub fn below(&self, k: usize) -> impl Iterator<Item = &EquivalenceClass> + '_ {
        self.classes.iter().filter(move |class| class.size < k)
    }

    pub fn smallest(&self) -> Option<usize> {
        self.classes.iter().map(|class| class.size).min()
    }

    /// Smallest class that passes the threshold.
    pub fn smallest_retained(&self, k: usize) -> Option<usize> {
        self.classes
            .iter()
            .map(|class| class.size)
            .filter(|&size| size >= k)
            .min()
    }
}

type Tally<'a> = Xxh3Map<&'a ClassKey, usize>;

fn merge<'a>(mut left: Tally<'a>, right: Tally<'a>) -> Tally<'a> {
    if left.len() < right.len() {
        return merge(right, left);
    }
    for (key, count) in right {
        *left.entry(key).or_insert(0) += count;
    }
    left
}

/// Group the rows of `table` by their `quasi_identifiers` tuple.
///
/// Columns are normalized in parallel, partial counts are folded per rayon
/// job and reduced before the result is returned, so the outcome is the same
/// as a sequential count.
///
/// # Errors
///
/// - `EmptyQuasiIdentifiers` when `quasi_identifiers` is empty
/// - `MissingColumn` when one of them is not in the table
/// - `UnsupportedType` when a column type cannot be normalized
pub fn class_sizes(
    table: &RecordBatch,
    quasi_identifiers: &[String],
) -> Result<EquivalenceClasses, AnonymizationError> {
    if quasi_identifiers.is_empty() {
        return Err(AnonymizationError::EmptyQuasiIdentifiers);
    }

    let schema = table.schema();
    let mut arrays = Vec::with_capacity(quasi_identifiers.len());
    for name in quasi_identifiers {
        let index = schema
            .index_of(name)
            .map_err(|_| AnonymizationError::MissingColumn(name.clone()))?;
        arrays.push((name, table.column(index)));
    }

    let columns = arrays
        .par_iter()
        .map(|(name, array)| normalize_array(array.as_ref(), name))
        .collect::<Result<Vec<Vec<QiValue>>, AnonymizationError>>()?;

    let num_rows = table.num_rows();
    let keys: Vec<ClassKey> = (0..num_rows)
        .into_par_iter()
        .map(|row| ClassKey::new(columns.iter().map(|column| column[row].clone()).collect()))
        .collect();

    let tally = keys
        .par_iter()
        .fold(
            Tally::default,
            |mut tally, key| {
                *tally.entry(key).or_insert(0) += 1;
                tally
            },
        )
        .reduce(Tally::default, merge);

    let mut counted: Vec<(&ClassKey, usize)> = tally.into_iter().collect();
    counted.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let covered: usize = counted.iter().map(|(_, size)| size).sum();
    if covered != num_rows {
        return Err(AnonymizationError::ClassMismatch {
            classes: covered,
            rows: num_rows,
        });
    }

    let mut index: Xxh3Map<&ClassKey, usize> = xxh3_map(counted.len());
    for (position, (key, _)) in counted.iter().enumerate() {
        index.insert(*key, position);
    }

    let row_classes: Vec<usize> = keys.par_iter().map(|key| index[key]).collect();

    let classes = counted
        .into_iter()
        .map(|(key, size)| EquivalenceClass {
            key: key.clone(),
            size,
        })
        .collect();

    Ok(EquivalenceClasses {
        quasi_identifiers: quasi_identifiers.to_vec(),
        classes,
        row_classes,
    })
}
