//! Hyperparameters of the extraction pipeline

use std::fmt;

use crate::dataset::{Float, Label};
use crate::error::{Error, Result};
use crate::param_guard::ParamGuard;

use super::rule::DecisionList;

/// Error floor used by pruning when none is supplied.
pub const DEFAULT_PRUNING_FLOOR: f64 = 1e-6;
/// Decay threshold used by pruning when none is supplied.
pub const DEFAULT_PRUNING_DECAY_THRESHOLD: f64 = 0.05;

/// The method used to filter near-duplicate rules before covering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMethod {
    /// Correlation-based covering over the rule coverage matrix.
    Cbc,
    /// Importance-guided selection through a regularized ensemble, as offered
    /// by the original inTrees toolkit. Recognized but not implemented;
    /// rejected by the parameter check.
    Rrf,
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMethod::Cbc => write!(f, "CBC"),
            SelectionMethod::Rrf => write!(f, "RRF"),
        }
    }
}

/// The checked set of hyperparameters for decision-list extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleExtractionValidParams {
    prune_rules: bool,
    pruning_floor: Option<f64>,
    pruning_decay_threshold: Option<f64>,
    selection_method: SelectionMethod,
    selection_threshold: f64,
    min_frequency: f64,
    seed: u64,
}

impl RuleExtractionValidParams {
    /// The resolved pruning schedule as `(floor, decay_threshold)`, or `None`
    /// when pruning is disabled.
    ///
    /// Supplying exactly one of the two pruning values is ambiguous tuning
    /// and disables pruning altogether; supplying neither selects the
    /// defaults.
    pub fn pruning(&self) -> Option<(f64, f64)> {
        if !self.prune_rules {
            return None;
        }
        match (self.pruning_floor, self.pruning_decay_threshold) {
            (None, None) => Some((DEFAULT_PRUNING_FLOOR, DEFAULT_PRUNING_DECAY_THRESHOLD)),
            (Some(floor), Some(decay)) => Some((floor, decay)),
            _ => None,
        }
    }

    pub fn selection_method(&self) -> SelectionMethod {
        self.selection_method
    }

    pub fn selection_threshold(&self) -> f64 {
        self.selection_threshold
    }

    pub fn min_frequency(&self) -> f64 {
        self.min_frequency
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// The set of hyperparameters that can be specified for decision-list
/// extraction.
///
/// Defaults are provided if the optional parameters are not specified:
/// * `prune_rules = true`, with floor `1e-6` and decay threshold `0.05`
/// * `selection_method = SelectionMethod::Cbc`
/// * `selection_threshold = 0.0`
/// * `min_frequency = 0.01`
/// * `seed = 1`
///
/// ### Example
///
/// ```rust
/// use intrees::{Atom, Cmp, Dataset, DecisionList, SymbolicModel, TreeNode};
/// use ndarray::array;
///
/// let dataset = Dataset::new(
///     array![[0.0], [1.0], [2.0], [3.0]],
///     array!["lo", "lo", "hi", "hi"],
/// );
/// let model = SymbolicModel::Tree(TreeNode::split(
///     Atom::new(0, Cmp::Less, 1.5),
///     TreeNode::leaf("lo"),
///     TreeNode::leaf("hi"),
/// ));
///
/// let list = DecisionList::<f64, &str>::params()
///     .min_frequency(0.05)
///     .seed(7)
///     .extract(&model, &dataset)
///     .unwrap();
/// assert_eq!(list.accuracy(&dataset), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RuleExtractionParams(RuleExtractionValidParams);

impl RuleExtractionParams {
    pub fn new() -> Self {
        Self(RuleExtractionValidParams {
            prune_rules: true,
            pruning_floor: None,
            pruning_decay_threshold: None,
            selection_method: SelectionMethod::Cbc,
            selection_threshold: 0.0,
            min_frequency: 0.01,
            seed: 1,
        })
    }

    /// Enables or disables the pruning stage.
    pub fn prune_rules(mut self, prune_rules: bool) -> Self {
        self.0.prune_rules = prune_rules;
        self
    }

    /// Sets the error floor used when computing relative decay during pruning.
    pub fn pruning_floor(mut self, floor: f64) -> Self {
        self.0.pruning_floor = Some(floor);
        self
    }

    /// Sets the relative error increase below which a conjunct is dropped.
    pub fn pruning_decay_threshold(mut self, decay_threshold: f64) -> Self {
        self.0.pruning_decay_threshold = Some(decay_threshold);
        self
    }

    /// Sets the rule selection method.
    pub fn selection_method(mut self, selection_method: SelectionMethod) -> Self {
        self.0.selection_method = selection_method;
        self
    }

    /// Sets the absolute-correlation threshold above which one of a rule pair
    /// is discarded.
    pub fn selection_threshold(mut self, selection_threshold: f64) -> Self {
        self.0.selection_threshold = selection_threshold;
        self
    }

    /// Sets the minimum fraction of the dataset a rule must cover to enter
    /// the covering loop.
    pub fn min_frequency(mut self, min_frequency: f64) -> Self {
        self.0.min_frequency = min_frequency;
        self
    }

    /// Sets the seed of the random source used to break exact ties.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl Default for RuleExtractionParams {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: Label> DecisionList<F, L> {
    /// The default extraction parameters; see [`RuleExtractionParams`].
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RuleExtractionParams {
        RuleExtractionParams::new()
    }
}

impl ParamGuard for RuleExtractionParams {
    type Checked = RuleExtractionValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if let Some(floor) = self.0.pruning_floor {
            if !(floor > 0.0) {
                return Err(Error::Parameters(format!(
                    "pruning floor must be positive, but was {}",
                    floor
                )));
            }
        }
        if let Some(decay) = self.0.pruning_decay_threshold {
            if !decay.is_finite() {
                return Err(Error::Parameters(format!(
                    "pruning decay threshold must be finite, but was {}",
                    decay
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.0.selection_threshold) {
            return Err(Error::Parameters(format!(
                "selection threshold must be in [0, 1], but was {}",
                self.0.selection_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.0.min_frequency) {
            return Err(Error::Parameters(format!(
                "min frequency must be in [0, 1], but was {}",
                self.0.min_frequency
            )));
        }
        if self.0.selection_method != SelectionMethod::Cbc {
            return Err(Error::UnknownSelectionMethod(
                self.0.selection_method.to_string(),
            ));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
