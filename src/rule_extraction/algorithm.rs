//! The extraction pipeline
//!
//! Wires the stages together: harvest rules from the model, prune each rule,
//! filter near-duplicates by coverage correlation, then order the survivors
//! with sequential covering. Configuration errors surface before any stage
//! runs; cancellation is observed between stages and inside the covering
//! loop.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::cancel::CancellationToken;
use crate::dataset::{Dataset, Float, Label};
use crate::error::{Error, Result};
use crate::model::SymbolicModel;
use crate::param_guard::ParamGuard;

use super::cover::sequential_cover;
use super::harvest::harvest_rules;
use super::hyperparams::{RuleExtractionParams, RuleExtractionValidParams, SelectionMethod};
use super::prune::prune_rules;
use super::rule::{Antecedent, Atom, DecisionList, Rule};
use super::select::select_rules;

impl RuleExtractionValidParams {
    /// Extract an ordered decision list from `model` over the labelled
    /// `dataset`.
    pub fn extract<F, L>(
        &self,
        model: &SymbolicModel<F, L>,
        dataset: &Dataset<F, L>,
    ) -> Result<DecisionList<F, L>>
    where
        F: Float + Send + Sync,
        L: Label + Send + Sync,
    {
        self.extract_cancellable(model, dataset, &CancellationToken::new())
    }

    /// Like [`extract`](Self::extract), but observing `token` between stages
    /// and between covering iterations.
    pub fn extract_cancellable<F, L>(
        &self,
        model: &SymbolicModel<F, L>,
        dataset: &Dataset<F, L>,
        token: &CancellationToken,
    ) -> Result<DecisionList<F, L>>
    where
        F: Float + Send + Sync,
        L: Label + Send + Sync,
    {
        if dataset.nsamples() == 0 {
            return Err(Error::DegenerateDataset);
        }

        let rules = harvest_rules(model)?;
        validate_shapes(&rules, dataset)?;
        token.checkpoint()?;

        let rules = match self.pruning() {
            Some((floor, decay_threshold)) => prune_rules(rules, dataset, floor, decay_threshold),
            None => rules,
        };
        token.checkpoint()?;

        let rules = match self.selection_method() {
            SelectionMethod::Cbc => select_rules(rules, dataset, self.selection_threshold()),
            other => return Err(Error::UnknownSelectionMethod(other.to_string())),
        };
        token.checkpoint()?;

        let mut rng = Xoshiro256Plus::seed_from_u64(self.seed());
        sequential_cover(rules, dataset, self.min_frequency(), &mut rng, token)
    }
}

impl RuleExtractionParams {
    /// Checks the parameters and extracts a decision list; see
    /// [`RuleExtractionValidParams::extract`].
    pub fn extract<F, L>(
        &self,
        model: &SymbolicModel<F, L>,
        dataset: &Dataset<F, L>,
    ) -> Result<DecisionList<F, L>>
    where
        F: Float + Send + Sync,
        L: Label + Send + Sync,
    {
        self.check_ref()?.extract(model, dataset)
    }

    /// Checks the parameters and extracts a decision list under `token`; see
    /// [`RuleExtractionValidParams::extract_cancellable`].
    pub fn extract_cancellable<F, L>(
        &self,
        model: &SymbolicModel<F, L>,
        dataset: &Dataset<F, L>,
        token: &CancellationToken,
    ) -> Result<DecisionList<F, L>>
    where
        F: Float + Send + Sync,
        L: Label + Send + Sync,
    {
        self.check_ref()?.extract_cancellable(model, dataset, token)
    }
}

/// Every atom must address a feature that exists in the dataset; failures
/// here are configuration errors raised before the pipeline starts.
fn validate_shapes<F: Float, L: Label>(
    rules: &[Rule<F, L>],
    dataset: &Dataset<F, L>,
) -> Result<()> {
    for rule in rules {
        match rule.antecedent() {
            Antecedent::Conjunctive(atoms) => validate_atoms(atoms, dataset, 0)?,
            Antecedent::MultiModal(modalities) => {
                for (&modality, atoms) in modalities {
                    if modality >= dataset.nmodalities() {
                        return Err(Error::Parameters(format!(
                            "antecedent references modality {} but the dataset has {}",
                            modality,
                            dataset.nmodalities()
                        )));
                    }
                    validate_atoms(atoms, dataset, modality)?;
                }
            }
        }
    }
    Ok(())
}

fn validate_atoms<F: Float, L: Label>(
    atoms: &[Atom<F>],
    dataset: &Dataset<F, L>,
    modality: usize,
) -> Result<()> {
    for atom in atoms {
        if atom.feature() >= dataset.nfeatures(modality) {
            return Err(Error::Parameters(format!(
                "atom references feature {} but modality {} has {} features",
                atom.feature(),
                modality,
                dataset.nfeatures(modality)
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_extraction::{Atom, Cmp};
    use crate::TreeNode;
    use ndarray::{array, Array1, Array2};

    fn stump(feature: usize, threshold: f64) -> SymbolicModel<f64, &'static str> {
        SymbolicModel::Tree(TreeNode::split(
            Atom::new(feature, Cmp::Less, threshold),
            TreeNode::leaf("lo"),
            TreeNode::leaf("hi"),
        ))
    }

    #[test]
    fn empty_datasets_are_rejected_up_front() {
        let empty: Dataset<f64, &str> =
            Dataset::new(Array2::zeros((0, 1)), Array1::from(Vec::<&str>::new()));
        let res = RuleExtractionParams::new().extract(&stump(0, 0.5), &empty);
        assert_eq!(res, Err(Error::DegenerateDataset));
    }

    #[test]
    fn atoms_outside_the_dataset_shape_are_rejected() {
        let dataset = Dataset::new(array![[0.0], [1.0]], array!["lo", "hi"]);
        let res = RuleExtractionParams::new().extract(&stump(3, 0.5), &dataset);
        assert!(matches!(res, Err(Error::Parameters(_))));
    }

    #[test]
    fn unchecked_params_are_checked_on_extraction() {
        let dataset = Dataset::new(array![[0.0], [1.0]], array!["lo", "hi"]);
        let res = RuleExtractionParams::new()
            .selection_method(SelectionMethod::Rrf)
            .extract(&stump(0, 0.5), &dataset);
        assert_eq!(res, Err(Error::UnknownSelectionMethod("RRF".to_string())));
    }

    #[test]
    fn cancelled_token_aborts_the_pipeline() {
        let dataset = Dataset::new(array![[0.0], [1.0]], array!["lo", "hi"]);
        let token = CancellationToken::new();
        token.cancel();
        let res =
            RuleExtractionParams::new().extract_cancellable(&stump(0, 0.5), &dataset, &token);
        assert_eq!(res, Err(Error::Cancelled));
    }
}
