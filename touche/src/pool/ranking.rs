//! Pool and overall rankings.
//!
//! Both rankings share one cascade: ratio, then index, then touches scored,
//! all descending, then the seed ascending so that no two lines compare
//! equal.

use std::{cmp::Ordering, collections::HashMap};

use super::{
    models::{Pool, PoolRanking},
    stats::{FencerStats, aggregate_all},
};
use crate::fencer::FencerId;

fn ranking_line(fencer: FencerId, seed: u32, stats: &FencerStats) -> PoolRanking {
    PoolRanking {
        fencer,
        rank: 0,
        seed,
        matches_played: stats.matches_played,
        victories: stats.victories,
        defeats: stats.defeats,
        touches_scored: stats.touches_scored,
        touches_received: stats.touches_received,
        index: stats.index(),
        ratio: stats.ratio(),
    }
}

/// Compares two lines, better first.
///
/// Ratios are compared by cross-multiplication so that equal fractions from
/// different match counts tie exactly.
pub fn compare_rankings(a: &PoolRanking, b: &PoolRanking) -> Ordering {
    let ratio_a = u64::from(a.victories) * u64::from(b.matches_played);
    let ratio_b = u64::from(b.victories) * u64::from(a.matches_played);

    ratio_b
        .cmp(&ratio_a)
        .then_with(|| b.index.cmp(&a.index))
        .then_with(|| b.touches_scored.cmp(&a.touches_scored))
        .then_with(|| a.seed.cmp(&b.seed))
        .then_with(|| a.fencer.cmp(&b.fencer))
}

/// Sorts lines with the cascade and numbers them from 1.
pub fn sort_rankings(lines: &mut [PoolRanking]) {
    lines.sort_by(compare_rankings);
    for (rank, line) in (1..).zip(lines.iter_mut()) {
        line.rank = rank;
    }
}

/// Ranking of one pool. The fallback key is the pool position.
pub fn rank_pool(pool: &Pool) -> Vec<PoolRanking> {
    let stats = aggregate_all(&pool.fencers, &pool.matches);
    let mut lines: Vec<PoolRanking> = pool
        .fencers
        .iter()
        .zip(1..)
        .map(|(fencer, position)| ranking_line(*fencer, position, &stats[fencer]))
        .collect();
    sort_rankings(&mut lines);
    lines
}

/// Qualification ranking over every pool of every round.
///
/// Statistics accumulate across rounds. The fallback key is the fencer's
/// place in `seed_order`; fencers missing from it come last.
pub fn overall_ranking<'a>(
    pools: impl IntoIterator<Item = &'a Pool>,
    seed_order: &[FencerId],
) -> Vec<PoolRanking> {
    let seeds: HashMap<FencerId, u32> = seed_order.iter().copied().zip(1..).collect();
    let mut totals: HashMap<FencerId, FencerStats> = HashMap::new();

    for pool in pools {
        for (fencer, stats) in aggregate_all(&pool.fencers, &pool.matches) {
            totals.entry(fencer).or_default().merge(&stats);
        }
    }

    let mut lines: Vec<PoolRanking> = totals
        .iter()
        .map(|(&fencer, stats)| {
            let seed = seeds.get(&fencer).copied().unwrap_or(u32::MAX);
            ranking_line(fencer, seed, stats)
        })
        .collect();
    sort_rankings(&mut lines);
    lines
}
