//! Row-addressable dataset views
//!
//! The extraction pipeline only needs a thin view over the training data: a
//! row count, per-modality feature tables, the label of every row and the
//! ability to slice rows out. Most callers have a single modality and use
//! [`Dataset::new`]; multi-modal data (one feature table per modality, all
//! sharing the row axis) goes through [`Dataset::multimodal`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ndarray::{Array1, Array2, Axis, NdFloat};
use num_traits::{FromPrimitive, NumCast};

use crate::error::{Error, Result};

/// Floating point numbers usable as feature values.
///
/// Implemented for 32bit and 64bit floating points, following the common
/// assumptions of numeric records.
pub trait Float: NdFloat + FromPrimitive {
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}
impl Float for f64 {}

/// Discrete labels
///
/// Labels are countable, comparable and hashable. The `Ord` bound gives every
/// label universe a documented total order, which the majority-class
/// tie-break below relies on.
pub trait Label: PartialEq + Eq + Hash + Clone + Ord + fmt::Debug {}

impl Label for bool {}
impl Label for usize {}
impl Label for u64 {}
impl Label for String {}
impl Label for &str {}

/// A labelled dataset with one feature table per modality.
///
/// All tables share the row axis; row `i` of every table describes the same
/// instance, labelled by `targets[i]`. The pipeline treats datasets as
/// read-only and produces shrunken copies via [`Dataset::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<F, L> {
    records: Vec<Array2<F>>,
    targets: Array1<L>,
}

impl<F: Float, L: Label> Dataset<F, L> {
    /// Create a single-modality dataset.
    ///
    /// # Panics
    ///
    /// Panics when the number of rows does not match the number of targets.
    pub fn new(records: Array2<F>, targets: Array1<L>) -> Self {
        assert_eq!(
            records.nrows(),
            targets.len(),
            "records and targets must agree on the number of samples"
        );
        Dataset {
            records: vec![records],
            targets,
        }
    }

    /// Create a dataset with one feature table per modality.
    pub fn multimodal(records: Vec<Array2<F>>, targets: Array1<L>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::Parameters(
                "a dataset needs at least one modality".to_string(),
            ));
        }
        for (modality, table) in records.iter().enumerate() {
            if table.nrows() != targets.len() {
                return Err(Error::Parameters(format!(
                    "modality {} has {} rows but there are {} targets",
                    modality,
                    table.nrows(),
                    targets.len()
                )));
            }
        }
        Ok(Dataset { records, targets })
    }

    pub fn nsamples(&self) -> usize {
        self.targets.len()
    }

    pub fn nmodalities(&self) -> usize {
        self.records.len()
    }

    pub fn nfeatures(&self, modality: usize) -> usize {
        self.records[modality].ncols()
    }

    /// The feature table of one modality.
    pub fn records(&self, modality: usize) -> &Array2<F> {
        &self.records[modality]
    }

    pub fn targets(&self) -> &Array1<L> {
        &self.targets
    }

    /// A new dataset holding the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Dataset {
            records: self
                .records
                .iter()
                .map(|table| table.select(Axis(0), indices))
                .collect(),
            targets: self.targets.select(Axis(0), indices),
        }
    }

    /// Counts how often each label occurs.
    pub fn label_frequencies(&self) -> HashMap<L, usize> {
        let mut freqs = HashMap::new();
        for label in self.targets.iter() {
            *freqs.entry(label.clone()).or_insert(0) += 1;
        }
        freqs
    }

    /// The most frequent label; ties go to the smallest label under `Ord`.
    ///
    /// Returns `None` on an empty dataset.
    pub fn majority_class(&self) -> Option<L> {
        self.label_frequencies()
            .into_iter()
            .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then_with(|| lb.cmp(la)))
            .map(|(label, _)| label)
    }
}
