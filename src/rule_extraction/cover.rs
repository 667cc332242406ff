//! Sequential covering
//!
//! The covering loop turns an unordered pool of rules into an ordered decision
//! list. A tautological fallback rule predicting the majority class is
//! appended to the pool; each iteration re-evaluates every rule on the rows
//! not yet covered, picks the best rule (minimum error, then maximum support,
//! then minimum length, then a seeded uniform draw among exact ties), appends
//! it and drops the rows it covers. Choosing the fallback ends the list; so
//! does running out of rows. The fallback's consequent is re-aimed at the
//! majority class of the remaining rows after every round.
//!
//! Rule metrics are computed in parallel; the random source is only ever
//! consumed on the coordinating thread, so the produced list is deterministic
//! for a fixed seed regardless of thread count.

use std::cmp::Ordering;

use rand::Rng;
use rayon::prelude::*;

use crate::cancel::CancellationToken;
use crate::dataset::{Dataset, Float, Label};
use crate::error::{Error, Result};

use super::evaluate::{coverage, rule_metrics, RuleMetrics};
use super::rule::{DecisionList, Rule};

pub(crate) fn sequential_cover<F, L, R>(
    rules: Vec<Rule<F, L>>,
    dataset: &Dataset<F, L>,
    min_frequency: f64,
    rng: &mut R,
    token: &CancellationToken,
) -> Result<DecisionList<F, L>>
where
    F: Float + Send + Sync,
    L: Label + Send + Sync,
    R: Rng,
{
    let default = dataset.majority_class().ok_or(Error::DegenerateDataset)?;

    // keep only rules frequent enough on the full dataset; the fallback rule
    // covers everything and is exempt by construction
    let supports: Vec<f64> = rules
        .par_iter()
        .map(|rule| rule_metrics(rule, dataset).support)
        .collect();
    let mut pool: Vec<Rule<F, L>> = rules
        .into_iter()
        .zip(supports)
        .filter(|(_, support)| *support >= min_frequency)
        .map(|(rule, _)| rule)
        .collect();
    pool.push(Rule::tautology(default.clone()));

    let mut remaining = dataset.clone();
    let mut ordered: Vec<Rule<F, L>> = Vec::new();

    loop {
        token.checkpoint()?;

        let metrics: Vec<RuleMetrics> = pool
            .par_iter()
            .map(|rule| rule_metrics(rule, &remaining))
            .collect();
        let best = best_rule_index(&metrics, rng)?;

        // the fallback rule is always the last pool entry
        if best == pool.len() - 1 {
            let consequent = pool[best].consequent().clone();
            return Ok(DecisionList::new(ordered, consequent));
        }
        ordered.push(pool[best].clone());

        let covered = coverage(&pool[best], &remaining);
        let keep: Vec<usize> = covered
            .iter()
            .enumerate()
            .filter(|(_, &c)| !c)
            .map(|(row, _)| row)
            .collect();
        remaining = remaining.select(&keep);
        if remaining.nsamples() == 0 {
            return Ok(DecisionList::new(ordered, default));
        }

        pool.remove(best);
        // re-aim the fallback at the majority of what is left
        let fallback = remaining.majority_class().ok_or_else(|| {
            Error::InternalInvariantViolated(
                "non-empty remaining dataset has no majority label".to_string(),
            )
        })?;
        let last = pool.len() - 1;
        pool[last] = Rule::tautology(fallback);
    }
}

/// Lexicographic best: minimum error, maximum support, minimum length; exact
/// ties are resolved by a uniform draw from `rng`.
fn best_rule_index<R: Rng>(metrics: &[RuleMetrics], rng: &mut R) -> Result<usize> {
    let mut ties: Vec<usize> = Vec::new();
    for (i, candidate) in metrics.iter().enumerate() {
        if ties.is_empty() {
            ties.push(i);
            continue;
        }
        let best = &metrics[ties[0]];
        let ordering = candidate
            .error
            .partial_cmp(&best.error)
            .unwrap_or(Ordering::Equal)
            .then(
                best.support
                    .partial_cmp(&candidate.support)
                    .unwrap_or(Ordering::Equal),
            )
            .then(candidate.length.cmp(&best.length));
        match ordering {
            Ordering::Less => {
                ties.clear();
                ties.push(i);
            }
            Ordering::Equal => ties.push(i),
            Ordering::Greater => {}
        }
    }

    match ties.len() {
        0 => Err(Error::InternalInvariantViolated(
            "no candidate rule to choose from".to_string(),
        )),
        1 => Ok(ties[0]),
        n => Ok(ties[rng.gen_range(0..n)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_extraction::{Antecedent, Atom, Cmp};
    use ndarray::{Array1, Array2};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn rule(atoms: Vec<Atom<f64>>, consequent: &'static str) -> Rule<f64, &'static str> {
        Rule::new(Antecedent::Conjunctive(atoms), consequent)
    }

    fn cover(
        rules: Vec<Rule<f64, &'static str>>,
        dataset: &Dataset<f64, &'static str>,
        min_frequency: f64,
    ) -> Result<DecisionList<f64, &'static str>> {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        sequential_cover(
            rules,
            dataset,
            min_frequency,
            &mut rng,
            &CancellationToken::new(),
        )
    }

    #[test]
    fn infrequent_rules_are_filtered_before_the_loop() {
        // one rule covering half a percent of the data
        let dataset = Dataset::new(
            Array2::from_shape_fn((200, 1), |(row, _)| row as f64),
            Array1::from_elem(200, "a"),
        );
        let rules = vec![rule(vec![Atom::new(0, Cmp::Less, 1.0)], "b")];

        let list = cover(rules, &dataset, 0.01).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.default_consequent(), &"a");
    }

    #[test]
    fn accurate_rule_is_ordered_before_the_fallback() {
        let dataset = Dataset::new(
            Array2::from_shape_fn((10, 1), |(row, _)| row as f64),
            Array1::from(vec!["a", "a", "a", "a", "a", "a", "b", "b", "b", "b"]),
        );
        let covering = rule(vec![Atom::new(0, Cmp::Less, 5.5)], "a");
        let list = cover(vec![covering.clone()], &dataset, 0.01).unwrap();

        assert_eq!(list.rules(), &[covering]);
        assert_eq!(list.default_consequent(), &"b");
        assert_eq!(list.accuracy(&dataset), 1.0);
    }

    #[test]
    fn full_cover_ties_resolve_to_the_shorter_fallback() {
        // a rule that correctly covers every row ties with the fallback on
        // error and support and loses on length
        let dataset = Dataset::new(
            Array2::from_shape_fn((4, 1), |(row, _)| row as f64),
            Array1::from_elem(4, "a"),
        );
        let full = rule(vec![Atom::new(0, Cmp::Less, 100.0)], "a");
        let list = cover(vec![full], &dataset, 0.01).unwrap();

        assert!(list.is_empty());
        assert_eq!(list.default_consequent(), &"a");
        assert_eq!(list.accuracy(&dataset), 1.0);
    }

    #[test]
    fn exact_ties_break_deterministically_for_a_fixed_seed() {
        let dataset = Dataset::new(
            Array2::from_shape_fn((4, 1), |(row, _)| row as f64),
            Array1::from(vec!["a", "a", "b", "b"]),
        );
        // identical (error, support, length), different coverage
        let first = rule(vec![Atom::new(0, Cmp::Less, 0.5)], "a");
        let second = rule(vec![Atom::new(0, Cmp::GreaterEqual, 2.5)], "b");
        let rules = vec![first, second];

        let once = cover(rules.clone(), &dataset, 0.01).unwrap();
        let again = cover(rules, &dataset, 0.01).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn cancellation_aborts_without_a_list() {
        let dataset = Dataset::new(
            Array2::from_shape_fn((4, 1), |(row, _)| row as f64),
            Array1::from(vec!["a", "a", "b", "b"]),
        );
        let token = CancellationToken::new();
        token.cancel();
        let mut rng = Xoshiro256Plus::seed_from_u64(1);

        let res = sequential_cover(
            vec![rule(vec![Atom::new(0, Cmp::Less, 0.5)], "a")],
            &dataset,
            0.01,
            &mut rng,
            &token,
        );
        assert_eq!(res, Err(Error::Cancelled));
    }

    #[test]
    fn covering_shrinks_the_remaining_rows_each_round() {
        let dataset = Dataset::new(
            Array2::from_shape_fn((9, 1), |(row, _)| row as f64),
            Array1::from(vec!["a", "a", "a", "b", "b", "b", "c", "c", "c"]),
        );
        let rules = vec![
            rule(vec![Atom::new(0, Cmp::Less, 2.5)], "a"),
            rule(
                vec![
                    Atom::new(0, Cmp::GreaterEqual, 2.5),
                    Atom::new(0, Cmp::Less, 5.5),
                ],
                "b",
            ),
        ];
        let list = cover(rules, &dataset, 0.01).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.default_consequent(), &"c");
        assert_eq!(list.accuracy(&dataset), 1.0);
    }
}
