//! The rule data model
//!
//! A rule pairs a conjunctive [`Antecedent`] with a predicted class label.
//! Rules are immutable; the pruning and covering stages derive new rules via
//! [`Rule::retain_conjuncts`] instead of mutating existing ones. An ordered
//! sequence of rules with a fallback label forms a [`DecisionList`], the
//! final product of the extraction pipeline.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array1, ArrayView1};

use crate::dataset::{Dataset, Float, Label};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Direction of a threshold comparison.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Less,
    GreaterEqual,
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmp::Less => write!(f, "<"),
            Cmp::GreaterEqual => write!(f, ">="),
        }
    }
}

/// An atomic threshold predicate `feature OP threshold` over a single row.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Atom<F> {
    feature: usize,
    cmp: Cmp,
    threshold: F,
}

impl<F: Float> Atom<F> {
    pub fn new(feature: usize, cmp: Cmp, threshold: F) -> Self {
        Atom {
            feature,
            cmp,
            threshold,
        }
    }

    pub fn feature(&self) -> usize {
        self.feature
    }

    /// The logical complement, obtained by flipping the comparison.
    pub fn negate(&self) -> Self {
        let cmp = match self.cmp {
            Cmp::Less => Cmp::GreaterEqual,
            Cmp::GreaterEqual => Cmp::Less,
        };
        Atom {
            feature: self.feature,
            cmp,
            threshold: self.threshold,
        }
    }

    /// Whether the predicate holds on the given row.
    pub fn holds(&self, row: &ArrayView1<F>) -> bool {
        match self.cmp {
            Cmp::Less => row[self.feature] < self.threshold,
            Cmp::GreaterEqual => row[self.feature] >= self.threshold,
        }
    }
}

impl<F: Float> fmt::Display for Atom<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{} {} {}", self.feature, self.cmp, self.threshold)
    }
}

/// A conjunction of atoms, single- or multi-modal.
///
/// A conjunctive antecedent evaluates its atoms against modality 0. A
/// multi-modal antecedent maps modality ids to per-modality conjunctions and
/// holds when every modality's conjunction holds on its own feature table.
/// For pruning and slicing purposes the conjuncts of a multi-modal antecedent
/// are its modalities, not its individual atoms.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent<F> {
    Conjunctive(Vec<Atom<F>>),
    MultiModal(BTreeMap<usize, Vec<Atom<F>>>),
}

impl<F: Float> Antecedent<F> {
    /// The number of conjuncts: atoms for conjunctive antecedents, modalities
    /// for multi-modal ones.
    pub fn n_conjuncts(&self) -> usize {
        match self {
            Antecedent::Conjunctive(atoms) => atoms.len(),
            Antecedent::MultiModal(modalities) => modalities.len(),
        }
    }

    /// An antecedent without atoms holds on every row.
    pub fn is_tautology(&self) -> bool {
        match self {
            Antecedent::Conjunctive(atoms) => atoms.is_empty(),
            Antecedent::MultiModal(modalities) => modalities.values().all(|a| a.is_empty()),
        }
    }

    /// A new antecedent keeping only the conjuncts at the given positions.
    ///
    /// Positions refer to conjunct order: atom order for conjunctive
    /// antecedents, ascending modality order for multi-modal ones. A
    /// multi-modal antecedent stays multi-modal even when one or zero
    /// modalities remain.
    pub fn retain(&self, positions: &[usize]) -> Self {
        match self {
            Antecedent::Conjunctive(atoms) => Antecedent::Conjunctive(
                positions
                    .iter()
                    .filter_map(|&i| atoms.get(i).cloned())
                    .collect(),
            ),
            Antecedent::MultiModal(modalities) => {
                let keys: Vec<usize> = modalities.keys().copied().collect();
                Antecedent::MultiModal(
                    positions
                        .iter()
                        .filter_map(|&i| keys.get(i))
                        .map(|key| (*key, modalities[key].clone()))
                        .collect(),
                )
            }
        }
    }

    /// Whether the whole conjunction holds on row `row` of the dataset.
    pub fn holds<L: Label>(&self, dataset: &Dataset<F, L>, row: usize) -> bool {
        match self {
            Antecedent::Conjunctive(atoms) => {
                let features = dataset.records(0).row(row);
                atoms.iter().all(|atom| atom.holds(&features))
            }
            Antecedent::MultiModal(modalities) => modalities.iter().all(|(&modality, atoms)| {
                let features = dataset.records(modality).row(row);
                atoms.iter().all(|atom| atom.holds(&features))
            }),
        }
    }
}

impl<F: Float> fmt::Display for Antecedent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_tautology() {
            return write!(f, "true");
        }
        match self {
            Antecedent::Conjunctive(atoms) => {
                for (i, atom) in atoms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", atom)?;
                }
                Ok(())
            }
            Antecedent::MultiModal(modalities) => {
                for (i, (modality, atoms)) in modalities.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "[m{}]", modality)?;
                    if atoms.is_empty() {
                        write!(f, " true")?;
                    }
                    for (j, atom) in atoms.iter().enumerate() {
                        if j > 0 {
                            write!(f, " &")?;
                        }
                        write!(f, " {}", atom)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// An IF-antecedent-THEN-class rule.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Rule<F, L> {
    antecedent: Antecedent<F>,
    consequent: L,
    /// Index of the tree this rule was harvested from, if any.
    provenance: Option<usize>,
}

impl<F: Float, L: Label> Rule<F, L> {
    pub fn new(antecedent: Antecedent<F>, consequent: L) -> Self {
        Rule {
            antecedent,
            consequent,
            provenance: None,
        }
    }

    /// The always-firing rule predicting `consequent`.
    pub fn tautology(consequent: L) -> Self {
        Rule::new(Antecedent::Conjunctive(Vec::new()), consequent)
    }

    pub fn with_provenance(mut self, tree: usize) -> Self {
        self.provenance = Some(tree);
        self
    }

    pub fn antecedent(&self) -> &Antecedent<F> {
        &self.antecedent
    }

    pub fn consequent(&self) -> &L {
        &self.consequent
    }

    pub fn provenance(&self) -> Option<usize> {
        self.provenance
    }

    pub fn n_conjuncts(&self) -> usize {
        self.antecedent.n_conjuncts()
    }

    /// A new rule keeping only the conjuncts at the given positions, with the
    /// same consequent and provenance.
    pub fn retain_conjuncts(&self, positions: &[usize]) -> Self {
        Rule {
            antecedent: self.antecedent.retain(positions),
            consequent: self.consequent.clone(),
            provenance: self.provenance,
        }
    }

    /// Structural equality on antecedent and consequent, ignoring provenance.
    /// This is the identity used when deduplicating harvested rules.
    pub fn structurally_equal(&self, other: &Self) -> bool {
        self.antecedent == other.antecedent && self.consequent == other.consequent
    }
}

impl<F: Float, L: Label> fmt::Display for Rule<F, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if {} then {:?}", self.antecedent, self.consequent)
    }
}

/// An ordered sequence of rules with a default fallback label.
///
/// Prediction walks the rules top to bottom and returns the consequent of the
/// first rule whose antecedent holds, or the default when none does.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionList<F, L> {
    rules: Vec<Rule<F, L>>,
    default: L,
}

impl<F: Float, L: Label> DecisionList<F, L> {
    pub fn new(rules: Vec<Rule<F, L>>, default: L) -> Self {
        DecisionList { rules, default }
    }

    pub fn rules(&self) -> &[Rule<F, L>] {
        &self.rules
    }

    pub fn default_consequent(&self) -> &L {
        &self.default
    }

    /// The number of non-default rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Predict the label of one row.
    pub fn predict_row(&self, dataset: &Dataset<F, L>, row: usize) -> L {
        self.rules
            .iter()
            .find(|rule| rule.antecedent().holds(dataset, row))
            .map(|rule| rule.consequent().clone())
            .unwrap_or_else(|| self.default.clone())
    }

    /// Predict the label of every row.
    pub fn predict(&self, dataset: &Dataset<F, L>) -> Array1<L> {
        Array1::from(
            (0..dataset.nsamples())
                .map(|row| self.predict_row(dataset, row))
                .collect::<Vec<_>>(),
        )
    }

    /// The fraction of rows whose prediction matches the dataset label.
    pub fn accuracy(&self, dataset: &Dataset<F, L>) -> f64 {
        let n = dataset.nsamples();
        if n == 0 {
            return 0.0;
        }
        let hits = self
            .predict(dataset)
            .iter()
            .zip(dataset.targets().iter())
            .filter(|(pred, truth)| pred == truth)
            .count();
        hits as f64 / n as f64
    }
}

impl<F: Float, L: Label> fmt::Display for DecisionList<F, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        write!(f, "else {:?}", self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn atom(feature: usize, cmp: Cmp, threshold: f64) -> Atom<f64> {
        Atom::new(feature, cmp, threshold)
    }

    #[test]
    fn negation_is_an_involution() {
        let a = atom(1, Cmp::Less, 0.5);
        assert_eq!(a.negate().negate(), a);

        let row = array![0.0, 0.4];
        assert!(a.holds(&row.view()));
        assert!(!a.negate().holds(&row.view()));
    }

    #[test]
    fn retain_keeps_the_requested_subsequence() {
        let ante = Antecedent::Conjunctive(vec![
            atom(0, Cmp::Less, 1.0),
            atom(1, Cmp::GreaterEqual, 2.0),
            atom(2, Cmp::Less, 3.0),
        ]);
        let sliced = ante.retain(&[0, 2]);
        assert_eq!(
            sliced,
            Antecedent::Conjunctive(vec![atom(0, Cmp::Less, 1.0), atom(2, Cmp::Less, 3.0)])
        );
    }

    #[test]
    fn multimodal_retain_keeps_the_multimodal_shape() {
        let mut modalities = BTreeMap::new();
        modalities.insert(0, vec![atom(0, Cmp::Less, 1.0)]);
        modalities.insert(3, vec![atom(1, Cmp::GreaterEqual, 2.0)]);
        let ante: Antecedent<f64> = Antecedent::MultiModal(modalities);

        // position 1 refers to the second modality in ascending key order
        let sliced = ante.retain(&[1]);
        match &sliced {
            Antecedent::MultiModal(kept) => {
                assert_eq!(kept.len(), 1);
                assert!(kept.contains_key(&3));
            }
            Antecedent::Conjunctive(_) => panic!("slice collapsed the multi-modal shape"),
        }
        assert_eq!(sliced.n_conjuncts(), 1);
    }

    #[test]
    fn decision_list_falls_through_to_the_default() {
        let dataset = Dataset::new(array![[0.0], [1.0], [2.0]], array!["a", "b", "c"]);
        let rules = vec![
            Rule::new(
                Antecedent::Conjunctive(vec![atom(0, Cmp::Less, 0.5)]),
                "a",
            ),
            Rule::new(
                Antecedent::Conjunctive(vec![atom(0, Cmp::Less, 1.5)]),
                "b",
            ),
        ];
        let list = DecisionList::new(rules, "c");

        assert_eq!(list.predict(&dataset), array!["a", "b", "c"]);
        assert_eq!(list.accuracy(&dataset), 1.0);
    }

    #[test]
    fn structural_equality_ignores_provenance() {
        let ante = Antecedent::Conjunctive(vec![atom(0, Cmp::Less, 1.0)]);
        let from_first_tree = Rule::new(ante.clone(), 1usize).with_provenance(0);
        let from_other_tree = Rule::new(ante, 1usize).with_provenance(7);
        assert!(from_first_tree.structurally_equal(&from_other_tree));
        assert_ne!(from_first_tree, from_other_tree);
    }

    #[test]
    fn tautology_holds_everywhere_and_renders_as_true() {
        let dataset = Dataset::new(array![[0.0], [5.0]], array![0usize, 1]);
        let rule: Rule<f64, usize> = Rule::tautology(1);
        assert!(rule.antecedent().holds(&dataset, 0));
        assert!(rule.antecedent().holds(&dataset, 1));
        assert_eq!(rule.to_string(), "if true then 1");
    }
}
