//! Score validation issues.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::Touches;
use crate::{bout::MatchId, fencer::FencerId};

/// Broad category of a score issue.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum IssueKind {
    InvalidScore,
    MaxScoreExceeded,
    InconsistentResult,
    DuplicateMatch,
}

/// A single problem found with a proposed score. Whether it blocks the
/// submission depends on which list of a `ValidationResult` it lands in.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ScoreIssue {
    #[error("invalid score {value}: touches cannot be negative")]
    InvalidScore { value: i32 },

    #[error("both scores are required")]
    MissingScore,

    #[error("score {value} exceeds the maximum of {max}")]
    MaxScoreExceeded { value: Touches, max: Touches },

    #[error("tie at {value} is not allowed without a designated winner")]
    TieNotAllowed { value: Touches },

    #[error("designated winner has {winner} touches against {loser}")]
    WinnerHasLowerScore { winner: Touches, loser: Touches },

    #[error("winner stopped at {value} touches, below the maximum of {max}")]
    WinnerBelowCap { value: Touches, max: Touches },

    #[error("unilateral score {value}-0")]
    UnilateralScore { value: Touches },

    #[error("fencers {first} and {second} already meet in match {existing}")]
    DuplicateMatch {
        first: FencerId,
        second: FencerId,
        existing: MatchId,
    },
}

impl ScoreIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::InvalidScore { .. } | Self::MissingScore => IssueKind::InvalidScore,
            Self::MaxScoreExceeded { .. } => IssueKind::MaxScoreExceeded,
            Self::TieNotAllowed { .. }
            | Self::WinnerHasLowerScore { .. }
            | Self::WinnerBelowCap { .. }
            | Self::UnilateralScore { .. } => IssueKind::InconsistentResult,
            Self::DuplicateMatch { .. } => IssueKind::DuplicateMatch,
        }
    }
}
