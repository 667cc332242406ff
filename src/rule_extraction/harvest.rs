//! Harvesting rules from tree paths
//!
//! Every root-to-leaf path of a tree is one rule: the atoms along the internal
//! nodes form the antecedent (negated where the path takes the right branch)
//! and the leaf label is the consequent. Paths are enumerated pre-order, left
//! before right, so harvesting is deterministic. Forests are harvested tree by
//! tree and the combined rule set is deduplicated by structural equality,
//! keeping first occurrences.

use crate::dataset::{Float, Label};
use crate::error::{Error, Result};
use crate::model::{SymbolicModel, TreeNode};

use super::rule::{Antecedent, Atom, Rule};

/// Harvest one rule per root-to-leaf path of every tree in the model,
/// deduplicated by antecedent and consequent.
pub fn harvest_rules<F: Float, L: Label>(model: &SymbolicModel<F, L>) -> Result<Vec<Rule<F, L>>> {
    let trees = model.trees();
    if trees.is_empty() {
        return Err(Error::UnsupportedModelKind(
            "forest containing no trees".to_string(),
        ));
    }

    let mut rules: Vec<Rule<F, L>> = Vec::new();
    for (tree, root) in trees.iter().enumerate() {
        let mut prefix = Vec::new();
        walk(root, tree, &mut prefix, &mut rules);
    }
    Ok(rules)
}

fn walk<F: Float, L: Label>(
    node: &TreeNode<F, L>,
    tree: usize,
    prefix: &mut Vec<Atom<F>>,
    rules: &mut Vec<Rule<F, L>>,
) {
    match node {
        TreeNode::Leaf { label } => {
            let rule = Rule::new(Antecedent::Conjunctive(prefix.clone()), label.clone())
                .with_provenance(tree);
            if !rules.iter().any(|seen| seen.structurally_equal(&rule)) {
                rules.push(rule);
            }
        }
        TreeNode::Split { atom, left, right } => {
            prefix.push(atom.clone());
            walk(left, tree, prefix, rules);
            prefix.pop();

            prefix.push(atom.negate());
            walk(right, tree, prefix, rules);
            prefix.pop();
        }
    }
}
