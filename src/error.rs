//! Error taxonomy for the verification pipeline.
//!
//! Input errors stop the pipeline before it starts; analyzer-local and LLM
//! errors are recorded on the affected `AnalysisResult` instead of
//! propagating (see `analyzer::AnalysisResult`). This enum only covers the
//! errors that *do* propagate to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShipSafeError {
    #[error("diff is empty")]
    EmptyDiff,

    #[error("invalid diff: {0}")]
    InvalidDiff(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShipSafeError>;
