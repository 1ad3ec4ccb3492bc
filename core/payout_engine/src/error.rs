//! Engine-wide error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A tier string from the store did not match any known tier.
    /// Silently assigning a zero weight would mis-pay workers, so this
    /// is a hard error at the data boundary.
    #[error("Unknown contribution tier: {0}")]
    UnknownTier(String),

    #[error("Unknown project category: {0}")]
    UnknownCategory(String),

    #[error("Unknown project status: {0}")]
    UnknownStatus(String),

    #[error("Unknown work type: {0}")]
    UnknownWorkType(String),

    /// Company projects must not carry an amount.
    #[error("Project {0} is a company project and must not have an amount")]
    AmountNotAllowed(i64),

    /// Every non-company project must carry an amount.
    #[error("Project {0} requires an amount")]
    AmountRequired(i64),
}

pub type Result<T> = std::result::Result<T, EngineError>;
