//! Error-decay rule pruning
//!
//! Pruning walks a rule's conjuncts in reverse order and drops every conjunct
//! whose removal does not increase the rule's error by more than a relative
//! decay threshold. The error baseline is updated after each drop, so later
//! decisions are relative to the already-pruned rule. A rule is never reduced
//! below one conjunct, and a multi-modal rule is pruned at the granularity of
//! whole modalities.

use rayon::prelude::*;

use crate::dataset::{Dataset, Float, Label};

use super::evaluate::rule_error;
use super::rule::Rule;

/// Prune one rule with the given error floor and decay threshold.
pub fn prune_rule<F: Float, L: Label>(
    rule: &Rule<F, L>,
    dataset: &Dataset<F, L>,
    floor: f64,
    decay_threshold: f64,
) -> Rule<F, L> {
    let n = rule.n_conjuncts();
    if n < 2 {
        return rule.clone();
    }

    let mut valid: Vec<usize> = (0..n).collect();
    let mut base_error = rule_error(rule, dataset);

    for i in (0..n).rev() {
        if valid.len() < 2 {
            break;
        }
        let candidate: Vec<usize> = valid.iter().copied().filter(|&kept| kept != i).collect();
        let error = rule_error(&rule.retain_conjuncts(&candidate), dataset);
        let decay = (error - base_error) / f64::max(base_error, floor);
        if decay < decay_threshold {
            valid = candidate;
            base_error = error;
        }
    }

    rule.retain_conjuncts(&valid)
}

/// Prune every rule independently, preserving order.
pub fn prune_rules<F, L>(
    rules: Vec<Rule<F, L>>,
    dataset: &Dataset<F, L>,
    floor: f64,
    decay_threshold: f64,
) -> Vec<Rule<F, L>>
where
    F: Float + Send + Sync,
    L: Label + Send + Sync,
{
    rules
        .into_par_iter()
        .map(|rule| prune_rule(&rule, dataset, floor, decay_threshold))
        .collect()
}
