//!
//! # Decision-list extraction
//! `intrees` turns decision trees and tree ensembles into compact, ordered
//! rule lists.
//!
//! # The big picture
//!
//! Tree ensembles predict well but are hard to read. The inTrees family of
//! methods (Deng, *Interpreting tree ensembles with inTrees*, 2019) recovers
//! interpretability after the fact: every root-to-leaf path of every tree
//! becomes an IF-THEN rule, each rule is pruned back to its informative
//! conjuncts, near-duplicate rules are filtered by the correlation of their
//! coverage, and a sequential covering pass orders the survivors into a
//! [`DecisionList`]: rules evaluated top to bottom with a default fallback.
//!
//! The pipeline runs on any [`SymbolicModel`]: a single tree or a forest of
//! trees whose internal nodes test threshold [`Atom`]s and whose leaves carry
//! class labels. Per-rule work (pruning, coverage, metrics) is parallelized
//! with `rayon`; the extracted list is deterministic for a fixed dataset,
//! model and seed, independent of the number of worker threads.
//!
//! # Current state
//!
//! `intrees` currently provides:
//!
//! * rule harvesting from single trees and forests, with structural
//!   deduplication
//! * error-decay rule pruning, including multi-modal rules pruned at modality
//!   granularity
//! * correlation-based rule selection (CBC)
//! * sequential covering with deterministic, seeded tie-breaking
//! * cooperative cancellation of long extractions
//!
//! Extraction is configured through [`RuleExtractionParams`]; see its
//! documentation for an end-to-end example.

mod cancel;
mod dataset;
mod error;
mod model;
mod param_guard;
pub mod prelude;
mod rule_extraction;

pub use cancel::CancellationToken;
pub use dataset::{Dataset, Float, Label};
pub use error::{Error, Result};
pub use model::{SymbolicModel, TreeNode};
pub use param_guard::ParamGuard;
pub use rule_extraction::*;
