//! Behaviour shared by pool matches and tableau matches.
//!
//! Consumers that accept either kind of match (statistics, outcome
//! resolution, fencer histories) go through the [`Bout`] trait, or hold a
//! [`MatchLike`] when they need to store both kinds side by side.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    fencer::FencerId,
    pool::models::Match,
    score::{Score, ScoreCap, Touches},
    tableau::models::TableauMatch,
};

/// Match identifier, unique within a competition.
pub type MatchId = u32;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    NotStarted,
    InProgress,
    Finished,
    Cancelled,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{repr}")
    }
}

/// Uniform read access to a match between two (possibly absent) fencers.
#[enum_dispatch]
pub trait Bout {
    fn id(&self) -> MatchId;
    fn fencer_a(&self) -> Option<FencerId>;
    fn fencer_b(&self) -> Option<FencerId>;
    fn score_a(&self) -> Option<&Score>;
    fn score_b(&self) -> Option<&Score>;
    fn status(&self) -> MatchStatus;
    fn max_score(&self) -> ScoreCap;

    fn is_finished(&self) -> bool {
        self.status() == MatchStatus::Finished
    }

    fn involves(&self, fencer: FencerId) -> bool {
        self.fencer_a() == Some(fencer) || self.fencer_b() == Some(fencer)
    }

    fn opponent_of(&self, fencer: FencerId) -> Option<FencerId> {
        if self.fencer_a() == Some(fencer) {
            self.fencer_b()
        } else if self.fencer_b() == Some(fencer) {
            self.fencer_a()
        } else {
            None
        }
    }

    /// The fencer's own score and their opponent's, when both are recorded.
    fn scores_for(&self, fencer: FencerId) -> Option<(&Score, &Score)> {
        if self.fencer_a() == Some(fencer) {
            Some((self.score_a()?, self.score_b()?))
        } else if self.fencer_b() == Some(fencer) {
            Some((self.score_b()?, self.score_a()?))
        } else {
            None
        }
    }

    fn winner(&self) -> Option<FencerId> {
        if !self.is_finished() {
            return None;
        }
        [self.fencer_a(), self.fencer_b()]
            .into_iter()
            .flatten()
            .find(|&fencer| {
                resolve_outcome(self, fencer).is_some_and(|outcome| outcome.is_victory())
            })
    }
}

/// Either kind of match, for consumers that mix them.
#[enum_dispatch(Bout)]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum MatchLike {
    Pool(Match),
    Tableau(TableauMatch),
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MatchResult {
    Victory,
    Defeat,
}

/// One fencer's view of a finished match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub result: MatchResult,
    pub touches_scored: Touches,
    pub touches_received: Touches,
}

impl MatchOutcome {
    pub fn is_victory(&self) -> bool {
        self.result == MatchResult::Victory
    }
}

/// Derives victory or defeat for `fencer` from a match's recorded scores.
///
/// A special status on the fencer's own score is a defeat whatever the
/// touches say; one on the opponent's score is a victory; otherwise the
/// victory flag decides. Returns `None` when the fencer is not in the match
/// or a score is missing.
pub fn resolve_outcome<B: Bout + ?Sized>(bout: &B, fencer: FencerId) -> Option<MatchOutcome> {
    let (own, opponent) = bout.scores_for(fencer)?;

    let result = if own.has_special_status() {
        MatchResult::Defeat
    } else if opponent.has_special_status() || own.is_victory {
        MatchResult::Victory
    } else {
        MatchResult::Defeat
    };

    Some(MatchOutcome {
        result,
        touches_scored: own.value,
        touches_received: opponent.value,
    })
}
