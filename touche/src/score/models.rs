//! Score data models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{bout::MatchId, fencer::FencerStatus};

/// Touch count.
pub type Touches = u32;

/// Which side of a match a score or fencer belongs to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Outcomes that bypass the touch count. A score carrying one of these is
/// a defeat and its opponent's score is a victory.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialStatus {
    /// The fencer withdrew or abandoned mid-bout.
    Abstention,
    /// The fencer was excluded by the referee.
    Exclusion,
    /// The fencer did not present themselves.
    Forfeit,
}

impl SpecialStatus {
    /// Roster status a fencer ends up with after this outcome.
    pub fn fencer_status(self) -> FencerStatus {
        match self {
            Self::Abstention => FencerStatus::Abandoned,
            Self::Exclusion => FencerStatus::Excluded,
            Self::Forfeit => FencerStatus::Forfeit,
        }
    }
}

impl fmt::Display for SpecialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Abstention => "ABS",
            Self::Exclusion => "EXC",
            Self::Forfeit => "FFT",
        };
        write!(f, "{repr}")
    }
}

/// One fencer's side of a match result.
///
/// The special status is an `Option` so at most one of abstention,
/// exclusion and forfeit can ever be set.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Score {
    pub value: Touches,
    pub is_victory: bool,
    #[serde(default)]
    pub special: Option<SpecialStatus>,
}

impl Score {
    pub fn victory(value: Touches) -> Self {
        Self {
            value,
            is_victory: true,
            special: None,
        }
    }

    pub fn defeat(value: Touches) -> Self {
        Self {
            value,
            is_victory: false,
            special: None,
        }
    }

    /// A defeat by special status.
    pub fn special(value: Touches, status: SpecialStatus) -> Self {
        Self {
            value,
            is_victory: false,
            special: Some(status),
        }
    }

    pub fn is_abstention(&self) -> bool {
        self.special == Some(SpecialStatus::Abstention)
    }

    pub fn is_exclusion(&self) -> bool {
        self.special == Some(SpecialStatus::Exclusion)
    }

    pub fn is_forfeit(&self) -> bool {
        self.special == Some(SpecialStatus::Forfeit)
    }

    pub fn has_special_status(&self) -> bool {
        self.special.is_some()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.special, self.is_victory) {
            (Some(status), _) => write!(f, "{status}"),
            (None, true) => write!(f, "V{}", self.value),
            (None, false) => write!(f, "{}", self.value),
        }
    }
}

/// Maximum touches in a match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCap {
    Limited(Touches),
    Unlimited,
}

impl ScoreCap {
    /// Maps a configured maximum to a cap, 0 meaning unlimited.
    pub fn from_config(value: Touches) -> Self {
        if value == 0 {
            Self::Unlimited
        } else {
            Self::Limited(value)
        }
    }

    pub fn limit(self) -> Option<Touches> {
        match self {
            Self::Limited(max) => Some(max),
            Self::Unlimited => None,
        }
    }

    pub fn allows(self, value: Touches) -> bool {
        self.limit().is_none_or(|max| value <= max)
    }
}

impl fmt::Display for ScoreCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(max) => write!(f, "{max}"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// A special outcome attached to one side of a submission.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SpecialOutcome {
    pub side: Side,
    pub status: SpecialStatus,
}

/// A score entered for a match, as typed in by the scorer.
///
/// Values are signed so that negative input reaches the validator instead
/// of failing earlier in parsing.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScoreSubmission {
    pub match_id: MatchId,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    /// Designated winner, required when both scores are equal (priority).
    #[serde(default)]
    pub winner_override: Option<Side>,
    #[serde(default)]
    pub special: Option<SpecialOutcome>,
}

impl ScoreSubmission {
    pub fn new(match_id: MatchId, score_a: i32, score_b: i32) -> Self {
        Self {
            match_id,
            score_a: Some(score_a),
            score_b: Some(score_b),
            winner_override: None,
            special: None,
        }
    }

    /// A submission decided by a special status on `side`.
    pub fn special(match_id: MatchId, side: Side, status: SpecialStatus) -> Self {
        Self {
            match_id,
            score_a: None,
            score_b: None,
            winner_override: None,
            special: Some(SpecialOutcome { side, status }),
        }
    }

    pub fn with_winner(mut self, side: Side) -> Self {
        self.winner_override = Some(side);
        self
    }
}
