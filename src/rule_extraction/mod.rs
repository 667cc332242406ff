mod algorithm;
mod cover;
mod evaluate;
mod harvest;
mod hyperparams;
mod prune;
mod rule;
mod select;

pub use evaluate::{coverage, evaluate_rule, rule_metrics, RuleEvaluation, RuleMetrics};
pub use harvest::harvest_rules;
pub use hyperparams::{
    RuleExtractionParams, RuleExtractionValidParams, SelectionMethod,
    DEFAULT_PRUNING_DECAY_THRESHOLD, DEFAULT_PRUNING_FLOOR,
};
pub use prune::{prune_rule, prune_rules};
pub use rule::{Antecedent, Atom, Cmp, DecisionList, Rule};
pub use select::select_rules;
