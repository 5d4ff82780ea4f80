//! Pool data models.

use serde::{Deserialize, Serialize};

use super::{
    errors::{PoolError, PoolResult},
    match_order::pool_match_order,
    ranking::rank_pool,
};
use crate::{
    bout::{Bout, MatchId, MatchStatus},
    fencer::FencerId,
    score::{
        Score, ScoreCap, ScoreSubmission, ValidationOptions, ValidationResult, resolve_submission,
    },
};

/// Pool bouts may end level when a winner is given by priority.
const PRIORITY_RULES: ValidationOptions = ValidationOptions {
    allow_tie: true,
    check_winner_has_cap: true,
};

/// A pool bout between two fencers.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Match {
    pub id: MatchId,
    /// Pool number (1-indexed).
    pub pool_number: u32,
    /// Place in the pool's bout order (1-indexed).
    pub number: u32,
    pub fencer_a: Option<FencerId>,
    pub fencer_b: Option<FencerId>,
    pub score_a: Option<Score>,
    pub score_b: Option<Score>,
    pub max_score: ScoreCap,
    pub status: MatchStatus,
}

impl Match {
    pub fn new(
        id: MatchId,
        pool_number: u32,
        number: u32,
        fencer_a: Option<FencerId>,
        fencer_b: Option<FencerId>,
        max_score: ScoreCap,
    ) -> Self {
        Self {
            id,
            pool_number,
            number,
            fencer_a,
            fencer_b,
            score_a: None,
            score_b: None,
            max_score,
            status: MatchStatus::NotStarted,
        }
    }

    /// Stores both scores and finishes the match.
    pub fn record(&mut self, score_a: Score, score_b: Score) {
        self.score_a = Some(score_a);
        self.score_b = Some(score_b);
        self.status = MatchStatus::Finished;
    }

    pub fn reset(&mut self) {
        self.score_a = None;
        self.score_b = None;
        self.status = MatchStatus::NotStarted;
    }

    pub fn cancel(&mut self) {
        self.status = MatchStatus::Cancelled;
    }
}

impl Bout for Match {
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
}

/// A fencer's line in a pool or overall ranking.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PoolRanking {
    pub fencer: FencerId,
    /// Position after sorting (1-indexed).
    pub rank: u32,
    /// Stable fallback key, lower ranks first when everything else is equal.
    pub seed: u32,
    pub matches_played: u32,
    pub victories: u32,
    pub defeats: u32,
    pub touches_scored: u32,
    pub touches_received: u32,
    /// Touches scored minus touches received.
    pub index: i32,
    /// Victories over matches played.
    pub ratio: f64,
}

/// A round-robin group of fencers.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Pool {
    /// Pool number within its round (1-indexed).
    pub number: u32,
    /// Pool round this pool belongs to (1-indexed).
    pub round: u32,
    /// Fencers in assignment order; a fencer's position is its index + 1.
    pub fencers: Vec<FencerId>,
    pub matches: Vec<Match>,
    pub ranking: Vec<PoolRanking>,
}

impl Pool {
    /// Creates a pool and its full bout order. Match ids are allocated
    /// sequentially from `first_match_id`.
    pub fn new(
        number: u32,
        round: u32,
        fencers: Vec<FencerId>,
        max_score: ScoreCap,
        first_match_id: MatchId,
    ) -> Self {
        let matches = pool_match_order(fencers.len())
            .into_iter()
            .zip(first_match_id..)
            .zip(1..)
            .map(|(((a, b), id), sequence)| {
                Match::new(
                    id,
                    number,
                    sequence,
                    Some(fencers[a - 1]),
                    Some(fencers[b - 1]),
                    max_score,
                )
            })
            .collect();

        let mut pool = Self {
            number,
            round,
            fencers,
            matches,
            ranking: Vec::new(),
        };
        pool.refresh_ranking();
        pool
    }

    pub fn size(&self) -> usize {
        self.fencers.len()
    }

    /// Position of a fencer in the pool (1-indexed).
    pub fn position_of(&self, fencer: FencerId) -> Option<usize> {
        self.fencers.iter().position(|&f| f == fencer).map(|idx| idx + 1)
    }

    pub fn contains(&self, fencer: FencerId) -> bool {
        self.fencers.contains(&fencer)
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// True once every match is finished or cancelled.
    pub fn is_complete(&self) -> bool {
        self.matches
            .iter()
            .all(|m| matches!(m.status, MatchStatus::Finished | MatchStatus::Cancelled))
    }

    /// Records a score for one of this pool's matches and refreshes the
    /// ranking. Touches are kept on special statuses so they still count
    /// toward the indicators.
    pub fn submit_score(
        &mut self,
        submission: &ScoreSubmission,
    ) -> PoolResult<ValidationResult> {
        let bout = self
            .matches
            .iter_mut()
            .find(|m| m.id == submission.match_id)
            .ok_or(PoolError::MatchNotFound(submission.match_id))?;

        if bout.status == MatchStatus::Cancelled {
            return Err(PoolError::MatchCancelled(bout.id));
        }

        let resolved = resolve_submission(submission, bout.max_score, PRIORITY_RULES, true)
            .map_err(|validation| PoolError::ScoreRejected(bout.id, validation))?;
        bout.record(resolved.score_a, resolved.score_b);

        self.refresh_ranking();
        Ok(resolved.validation)
    }

    pub fn reset_match(&mut self, id: MatchId) -> PoolResult<()> {
        let bout = self
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(PoolError::MatchNotFound(id))?;
        bout.reset();
        self.refresh_ranking();
        Ok(())
    }

    pub fn refresh_ranking(&mut self) {
        self.ranking = rank_pool(self);
    }
}
