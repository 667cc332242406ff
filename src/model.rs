//! Symbolic input models
//!
//! Rule extraction consumes tree-shaped classifiers whose internal nodes carry
//! a threshold [`Atom`] and whose leaves carry a class label. Rows for which
//! the atom holds descend into the left child; the others into the right
//! child. A [`SymbolicModel`] is either one such tree or a forest of them.

use crate::dataset::{Float, Label};
use crate::rule_extraction::Atom;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A node of a symbolic decision tree.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode<F, L> {
    /// An internal node testing `atom`; rows satisfying it take `left`.
    Split {
        atom: Atom<F>,
        left: Box<TreeNode<F, L>>,
        right: Box<TreeNode<F, L>>,
    },
    /// A leaf predicting `label`.
    Leaf { label: L },
}

impl<F: Float, L: Label> TreeNode<F, L> {
    pub fn split(atom: Atom<F>, left: TreeNode<F, L>, right: TreeNode<F, L>) -> Self {
        TreeNode::Split {
            atom,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn leaf(label: L) -> Self {
        TreeNode::Leaf { label }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }
}

/// A tree-shaped classifier rules can be harvested from.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicModel<F, L> {
    /// A single decision tree, represented by its root node.
    Tree(TreeNode<F, L>),
    /// An ensemble of decision trees.
    Forest(Vec<TreeNode<F, L>>),
}

impl<F: Float, L: Label> SymbolicModel<F, L> {
    /// The trees of this model, a single-tree model being a forest of one.
    pub fn trees(&self) -> &[TreeNode<F, L>] {
        match self {
            SymbolicModel::Tree(root) => std::slice::from_ref(root),
            SymbolicModel::Forest(roots) => roots,
        }
    }
}
