//! Correlation-based rule selection
//!
//! Near-duplicate rules cover nearly the same instances. Selection computes
//! every rule's coverage mask, treats the masks as 0/1 columns of a coverage
//! matrix and greedily drops columns until no pair correlates (in absolute
//! value) above the configured threshold. Constant columns (rules covering
//! everything or nothing) have no variance and are dropped up front.
//! The Pearson correlation between two 0/1 columns reduces to population
//! counts and is therefore computed exactly.

use rayon::prelude::*;

use crate::dataset::{Dataset, Float, Label};

use super::evaluate::coverage;
use super::rule::Rule;

/// Filter `rules` down to a mutually decorrelated subset, preserving order.
pub fn select_rules<F, L>(
    rules: Vec<Rule<F, L>>,
    dataset: &Dataset<F, L>,
    threshold: f64,
) -> Vec<Rule<F, L>>
where
    F: Float + Send + Sync,
    L: Label + Send + Sync,
{
    let coverages: Vec<Vec<bool>> = rules
        .par_iter()
        .map(|rule| coverage(rule, dataset))
        .collect();

    // constant columns have no variance and are dropped first
    let candidates: Vec<usize> = (0..rules.len())
        .filter(|&j| {
            let column = &coverages[j];
            column.iter().any(|&c| c) && column.iter().any(|&c| !c)
        })
        .collect();

    let correlations: Vec<Vec<f64>> = candidates
        .iter()
        .map(|&a| {
            candidates
                .iter()
                .map(|&b| pearson(&coverages[a], &coverages[b]))
                .collect()
        })
        .collect();

    let kept = find_correlation(&correlations, threshold);
    let keep: Vec<usize> = kept.into_iter().map(|k| candidates[k]).collect();

    rules
        .into_iter()
        .enumerate()
        .filter(|(j, _)| keep.binary_search(j).is_ok())
        .map(|(_, rule)| rule)
        .collect()
}

/// Pearson correlation of two boolean columns, exact via population counts.
fn pearson(a: &[bool], b: &[bool]) -> f64 {
    let n = a.len() as f64;
    let na = a.iter().filter(|&&x| x).count() as f64;
    let nb = b.iter().filter(|&&x| x).count() as f64;
    let nab = a
        .iter()
        .zip(b.iter())
        .filter(|(&x, &y)| x && y)
        .count() as f64;

    let numerator = n * nab - na * nb;
    let denominator = ((n * na - na * na) * (n * nb - nb * nb)).sqrt();
    numerator / denominator
}

/// Greedy decorrelation over a symmetric correlation matrix.
///
/// Repeatedly picks the surviving pair with the largest absolute correlation
/// above `threshold` and drops the member with the higher mean absolute
/// correlation to the other survivors; ties drop the later column. Returns
/// the surviving column indices in ascending order.
fn find_correlation(correlations: &[Vec<f64>], threshold: f64) -> Vec<usize> {
    let ncols = correlations.len();
    let mut alive = vec![true; ncols];

    loop {
        let mut strongest: Option<(usize, usize, f64)> = None;
        for a in 0..ncols {
            if !alive[a] {
                continue;
            }
            for b in (a + 1)..ncols {
                if !alive[b] {
                    continue;
                }
                let c = correlations[a][b].abs();
                if c > threshold {
                    strongest = match strongest {
                        Some((_, _, best)) if best >= c => strongest,
                        _ => Some((a, b, c)),
                    };
                }
            }
        }

        let (a, b) = match strongest {
            Some((a, b, _)) => (a, b),
            None => break,
        };
        let drop = if mean_abs_correlation(correlations, &alive, a)
            > mean_abs_correlation(correlations, &alive, b)
        {
            a
        } else {
            b
        };
        alive[drop] = false;
    }

    (0..ncols).filter(|&i| alive[i]).collect()
}

fn mean_abs_correlation(correlations: &[Vec<f64>], alive: &[bool], i: usize) -> f64 {
    let mut sum = 0.0;
    let mut count = 0;
    for k in 0..correlations.len() {
        if k != i && alive[k] {
            sum += correlations[i][k].abs();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
