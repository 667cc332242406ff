//! Re-exports of the commonly used types and traits
//!

pub use crate::cancel::CancellationToken;
pub use crate::dataset::{Dataset, Float, Label};
pub use crate::error::{Error, Result};
pub use crate::model::{SymbolicModel, TreeNode};
pub use crate::param_guard::ParamGuard;
pub use crate::rule_extraction::{
    Antecedent, Atom, Cmp, DecisionList, Rule, RuleExtractionParams, SelectionMethod,
};
