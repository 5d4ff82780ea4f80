//! Competition data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Competition phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionPhase {
    /// Fencers are checking in
    CheckIn,
    /// A pool round is being fenced (1-indexed)
    Pools { round: u32 },
    /// The tableau is being fenced
    Tableau,
    /// Every result is in
    Finished,
}

impl fmt::Display for CompetitionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckIn => write!(f, "check-in"),
            Self::Pools { round } => write!(f, "pool round {round}"),
            Self::Tableau => write!(f, "tableau"),
            Self::Finished => write!(f, "finished"),
        }
    }
}
