//! Error types for decision-list extraction
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("unsupported model kind: {0}")]
    UnsupportedModelKind(String),
    #[error("unknown selection method {0}")]
    UnknownSelectionMethod(String),
    #[error("dataset contains no samples")]
    DegenerateDataset,
    #[error("extraction was cancelled")]
    Cancelled,
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolated(String),
}
