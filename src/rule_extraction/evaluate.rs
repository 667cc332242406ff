//! Rule evaluation and metrics
//!
//! Evaluating a rule against a labelled dataset yields a per-instance
//! satisfaction mask and the induced predictions; the derived metrics
//! (support, error, confidence, length) drive pruning, selection and the
//! covering loop. Both are pure functions of the rule and the dataset.

use crate::dataset::{Dataset, Float, Label};

use super::rule::Rule;

/// The outcome of evaluating one rule on every row of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEvaluation<L> {
    /// Whether the antecedent holds, per row.
    pub ant_sat: Vec<bool>,
    /// Indices of the rows where the antecedent holds.
    pub idxs_sat: Vec<usize>,
    /// The rule's prediction on covered rows, `None` elsewhere.
    pub y_pred: Vec<Option<L>>,
    /// Whether the prediction matches the label on covered rows, `None`
    /// elsewhere.
    pub cons_sat: Vec<Option<bool>>,
}

/// Evaluate `rule` on every row of `dataset`.
pub fn evaluate_rule<F: Float, L: Label>(
    rule: &Rule<F, L>,
    dataset: &Dataset<F, L>,
) -> RuleEvaluation<L> {
    let n = dataset.nsamples();
    let mut ant_sat = Vec::with_capacity(n);
    let mut idxs_sat = Vec::new();
    let mut y_pred = Vec::with_capacity(n);
    let mut cons_sat = Vec::with_capacity(n);

    for (row, truth) in dataset.targets().iter().enumerate() {
        let covered = rule.antecedent().holds(dataset, row);
        ant_sat.push(covered);
        if covered {
            idxs_sat.push(row);
            y_pred.push(Some(rule.consequent().clone()));
            cons_sat.push(Some(rule.consequent() == truth));
        } else {
            y_pred.push(None);
            cons_sat.push(None);
        }
    }

    RuleEvaluation {
        ant_sat,
        idxs_sat,
        y_pred,
        cons_sat,
    }
}

/// The coverage mask of a rule: whether its antecedent holds, per row.
pub fn coverage<F: Float, L: Label>(rule: &Rule<F, L>, dataset: &Dataset<F, L>) -> Vec<bool> {
    (0..dataset.nsamples())
        .map(|row| rule.antecedent().holds(dataset, row))
        .collect()
}

/// Quality measures of one rule over a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMetrics {
    /// Fraction of rows the antecedent covers.
    pub support: f64,
    /// Fraction of covered rows predicted wrongly; 1.0 when nothing is covered.
    pub error: f64,
    /// `1 - error`.
    pub confidence: f64,
    /// Number of conjuncts in the antecedent.
    pub length: usize,
}

/// Compute `{support, error, confidence, length}` for `rule` over `dataset`.
pub fn rule_metrics<F: Float, L: Label>(rule: &Rule<F, L>, dataset: &Dataset<F, L>) -> RuleMetrics {
    let n = dataset.nsamples();
    let (covered, missed) = coverage_counts(rule, dataset);

    let support = covered as f64 / usize::max(1, n) as f64;
    let error = if covered == 0 {
        1.0
    } else {
        missed as f64 / covered as f64
    };

    RuleMetrics {
        support,
        error,
        confidence: 1.0 - error,
        length: rule.n_conjuncts(),
    }
}

/// The error of `rule` over `dataset`, without materializing the evaluation.
pub(crate) fn rule_error<F: Float, L: Label>(rule: &Rule<F, L>, dataset: &Dataset<F, L>) -> f64 {
    let (covered, missed) = coverage_counts(rule, dataset);
    if covered == 0 {
        1.0
    } else {
        missed as f64 / covered as f64
    }
}

fn coverage_counts<F: Float, L: Label>(
    rule: &Rule<F, L>,
    dataset: &Dataset<F, L>,
) -> (usize, usize) {
    let mut covered = 0;
    let mut missed = 0;
    for (row, truth) in dataset.targets().iter().enumerate() {
        if rule.antecedent().holds(dataset, row) {
            covered += 1;
            if rule.consequent() != truth {
                missed += 1;
            }
        }
    }
    (covered, missed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_extraction::{Antecedent, Atom, Cmp};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn dataset() -> Dataset<f64, usize> {
        Dataset::new(
            array![[0.0], [1.0], [2.0], [3.0]],
            array![1usize, 1, 0, 1],
        )
    }

    #[test]
    fn evaluation_matches_the_contract() {
        // covers rows 0..3, wrong on row 2
        let rule = Rule::new(
            Antecedent::Conjunctive(vec![Atom::new(0, Cmp::Less, 2.5)]),
            1usize,
        );
        let eval = evaluate_rule(&rule, &dataset());

        assert_eq!(eval.ant_sat, vec![true, true, true, false]);
        assert_eq!(eval.idxs_sat, vec![0, 1, 2]);
        assert_eq!(eval.y_pred, vec![Some(1), Some(1), Some(1), None]);
        assert_eq!(
            eval.cons_sat,
            vec![Some(true), Some(true), Some(false), None]
        );
    }

    #[test]
    fn metrics_follow_the_evaluation() {
        let rule = Rule::new(
            Antecedent::Conjunctive(vec![Atom::new(0, Cmp::Less, 2.5)]),
            1usize,
        );
        let metrics = rule_metrics(&rule, &dataset());

        assert_abs_diff_eq!(metrics.support, 0.75);
        assert_abs_diff_eq!(metrics.error, 1.0 / 3.0);
        assert_abs_diff_eq!(metrics.confidence, 2.0 / 3.0);
        assert_eq!(metrics.length, 1);
    }

    #[test]
    fn uncovered_rules_have_full_error_and_zero_support() {
        let rule = Rule::new(
            Antecedent::Conjunctive(vec![Atom::new(0, Cmp::Less, -1.0)]),
            1usize,
        );
        let metrics = rule_metrics(&rule, &dataset());

        assert_abs_diff_eq!(metrics.support, 0.0);
        assert_abs_diff_eq!(metrics.error, 1.0);
    }

    #[test]
    fn tautologies_cover_everything() {
        let rule: Rule<f64, usize> = Rule::tautology(1);
        let metrics = rule_metrics(&rule, &dataset());

        assert_abs_diff_eq!(metrics.support, 1.0);
        assert_abs_diff_eq!(metrics.error, 0.25);
        assert_eq!(metrics.length, 0);
    }
}
