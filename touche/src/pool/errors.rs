//! Pool error types.

use thiserror::Error;

use crate::{bout::MatchId, score::ValidationResult};

/// Pool errors
#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("match {0} is not in this pool")]
    MatchNotFound(MatchId),

    #[error("match {0} was cancelled")]
    MatchCancelled(MatchId),

    #[error("score rejected for match {0}: {1}")]
    ScoreRejected(MatchId, ValidationResult),
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
