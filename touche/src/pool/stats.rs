//! Per-fencer indicators aggregated over finished matches.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    bout::{Bout, MatchOutcome, resolve_outcome},
    fencer::FencerId,
};

/// Victories, defeats and touches accumulated over a set of matches.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FencerStats {
    pub matches_played: u32,
    pub victories: u32,
    pub defeats: u32,
    pub touches_scored: u32,
    pub touches_received: u32,
}

impl FencerStats {
    pub fn add(&mut self, outcome: MatchOutcome) {
        self.matches_played += 1;
        if outcome.is_victory() {
            self.victories += 1;
        } else {
            self.defeats += 1;
        }
        self.touches_scored += outcome.touches_scored;
        self.touches_received += outcome.touches_received;
    }

    pub fn merge(&mut self, other: &FencerStats) {
        self.matches_played += other.matches_played;
        self.victories += other.victories;
        self.defeats += other.defeats;
        self.touches_scored += other.touches_scored;
        self.touches_received += other.touches_received;
    }

    pub fn index(&self) -> i32 {
        self.touches_scored as i32 - self.touches_received as i32
    }

    /// Victories over matches played, 0 before the first match.
    pub fn ratio(&self) -> f64 {
        if self.matches_played == 0 {
            0.0
        } else {
            f64::from(self.victories) / f64::from(self.matches_played)
        }
    }
}

/// Indicators for one fencer over the finished matches they took part in.
pub fn aggregate_stats<'a, B>(fencer: FencerId, matches: impl IntoIterator<Item = &'a B>) -> FencerStats
where
    B: Bout + 'a,
{
    matches
        .into_iter()
        .filter(|bout| bout.is_finished())
        .filter_map(|bout| resolve_outcome(bout, fencer))
        .fold(FencerStats::default(), |mut stats, outcome| {
            stats.add(outcome);
            stats
        })
}

/// Indicators for every fencer appearing in `matches`, in a single pass.
///
/// Fencers listed in `fencers` are present in the map even without any
/// finished match.
pub fn aggregate_all<'a, B>(
    fencers: &[FencerId],
    matches: impl IntoIterator<Item = &'a B>,
) -> HashMap<FencerId, FencerStats>
where
    B: Bout + 'a,
{
    let mut stats: HashMap<FencerId, FencerStats> = fencers
        .iter()
        .map(|&fencer| (fencer, FencerStats::default()))
        .collect();

    for bout in matches.into_iter().filter(|bout| bout.is_finished()) {
        for fencer in [bout.fencer_a(), bout.fencer_b()].into_iter().flatten() {
            if let Some(outcome) = resolve_outcome(bout, fencer) {
                stats.entry(fencer).or_default().add(outcome);
            }
        }
    }

    stats
}
