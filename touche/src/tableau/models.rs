//! Tableau data models.

use serde::{Deserialize, Serialize};

use crate::{
    bout::{Bout, MatchId, MatchStatus},
    fencer::FencerId,
    score::{Score, ScoreCap},
};

/// Round size of the final.
pub const FINAL_ROUND: u32 = 2;

/// Round size attached to the match for third place.
pub const THIRD_PLACE_ROUND: u32 = 3;

/// Round size of the semi-finals.
pub const SEMI_FINAL_ROUND: u32 = 4;

/// One node of the tableau.
///
/// Nodes never point at each other: the node fed by `(round_size, position)`
/// is always `(round_size / 2, position / 2)`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableauMatch {
    pub id: MatchId,
    /// Fencers left in the round: 2 for the final, 3 for third place.
    pub round_size: u32,
    /// Position within the round (0-indexed).
    pub position: u32,
    pub fencer_a: Option<FencerId>,
    pub fencer_b: Option<FencerId>,
    pub score_a: Option<Score>,
    pub score_b: Option<Score>,
    pub winner: Option<FencerId>,
    /// Set when the winner advanced without an opponent.
    pub is_bye: bool,
    pub max_score: ScoreCap,
    pub status: MatchStatus,
}

impl TableauMatch {
    pub fn new(id: MatchId, round_size: u32, position: u32, max_score: ScoreCap) -> Self {
        Self {
            id,
            round_size,
            position,
            fencer_a: None,
            fencer_b: None,
            score_a: None,
            score_b: None,
            winner: None,
            is_bye: false,
            max_score,
            status: MatchStatus::NotStarted,
        }
    }

    pub fn is_final(&self) -> bool {
        self.round_size == FINAL_ROUND
    }

    pub fn is_third_place(&self) -> bool {
        self.round_size == THIRD_PLACE_ROUND
    }

    /// Both fencers are known and the match still has to be fenced.
    pub fn is_ready(&self) -> bool {
        self.fencer_a.is_some() && self.fencer_b.is_some() && !self.is_finished()
    }

    /// The defeated fencer. Byes have none.
    pub fn loser(&self) -> Option<FencerId> {
        if self.is_bye {
            return None;
        }
        self.winner.and_then(|winner| self.opponent_of(winner))
    }

    pub(crate) fn record(&mut self, score_a: Score, score_b: Score, winner: FencerId) {
        self.score_a = Some(score_a);
        self.score_b = Some(score_b);
        self.winner = Some(winner);
        self.is_bye = false;
        self.status = MatchStatus::Finished;
    }

    pub(crate) fn mark_bye(&mut self, fencer: FencerId) {
        self.score_a = None;
        self.score_b = None;
        self.winner = Some(fencer);
        self.is_bye = true;
        self.status = MatchStatus::Finished;
    }

    /// Drops the result but keeps the fencers in place.
    pub(crate) fn clear_result(&mut self) {
        self.score_a = None;
        self.score_b = None;
        self.winner = None;
        self.is_bye = false;
        self.status = MatchStatus::NotStarted;
    }
}

impl Bout for TableauMatch {
    fn id(&self) -> MatchId {
        self.id
    }

    fn fencer_a(&self) -> Option<FencerId> {
        self.fencer_a
    }

    fn fencer_b(&self) -> Option<FencerId> {
        self.fencer_b
    }

    fn score_a(&self) -> Option<&Score> {
        self.score_a.as_ref()
    }

    fn score_b(&self) -> Option<&Score> {
        self.score_b.as_ref()
    }

    fn status(&self) -> MatchStatus {
        self.status
    }

    fn max_score(&self) -> ScoreCap {
        self.max_score
    }

    fn winner(&self) -> Option<FencerId> {
        self.winner
    }
}
