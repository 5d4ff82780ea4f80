//! Tableau error types.

use thiserror::Error;

use crate::{bout::MatchId, score::ValidationResult};

/// Tableau errors
#[derive(Debug, Error, PartialEq)]
pub enum TableauError {
    #[error("match {0} is not in the tableau")]
    MatchNotFound(MatchId),

    #[error("match {0} is still waiting for a fencer")]
    MatchNotReady(MatchId),

    #[error("match {0} is a bye")]
    ByeMatch(MatchId),

    #[error("score rejected for match {0}: {1}")]
    ScoreRejected(MatchId, ValidationResult),
}

/// Result type for tableau operations
pub type TableauResult<T> = Result<T, TableauError>;
