//! Serpentine pool distribution.
//!
//! Seeds are dealt across pools in a snake: 1 to N left to right, N+1 to 2N
//! right to left, and so on. An optional pass then swaps fencers of adjacent
//! seeds sitting in adjacent pools when that strictly lowers the number of
//! same-affiliation pairs in those two pools. The pass is a heuristic, not a
//! solver: it never looks further than neighbouring seeds.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::fencer::{Fencer, FencerId};

/// Allowed pool sizes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PoolSizeBand {
    pub min: usize,
    pub max: usize,
}

impl Default for PoolSizeBand {
    fn default() -> Self {
        Self { min: 5, max: 7 }
    }
}

/// Which shared affiliations should be kept out of the same pool.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DistributionOptions {
    pub avoid_same_club: bool,
    pub avoid_same_league: bool,
    pub avoid_same_nation: bool,
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            avoid_same_club: true,
            avoid_same_league: true,
            avoid_same_nation: false,
        }
    }
}

impl DistributionOptions {
    pub fn none() -> Self {
        Self {
            avoid_same_club: false,
            avoid_same_league: false,
            avoid_same_nation: false,
        }
    }

    fn any(&self) -> bool {
        self.avoid_same_club || self.avoid_same_league || self.avoid_same_nation
    }

    /// Number of affiliations the two fencers share among the enabled ones.
    fn shared(&self, a: &Fencer, b: &Fencer) -> usize {
        let same = |x: &Option<String>, y: &Option<String>| x.is_some() && x == y;
        [
            self.avoid_same_club && same(&a.club, &b.club),
            self.avoid_same_league && same(&a.league, &b.league),
            self.avoid_same_nation && same(&a.nation, &b.nation),
        ]
        .into_iter()
        .filter(|&collides| collides)
        .count()
    }
}

/// Smallest pool count whose pools all fit the band.
///
/// A roster smaller than the band minimum fences as a single pool; fewer
/// than two fencers cannot form a pool at all.
pub fn suggest_pool_count(fencers: usize, band: PoolSizeBand) -> usize {
    if fencers < 2 {
        return 0;
    }
    let max = band.max.max(2);
    let min = band.min.clamp(2, max);
    if fencers <= max {
        return 1;
    }

    let lowest = fencers.div_ceil(max);
    let highest = fencers / min;
    (lowest..=highest)
        .find(|&pools| fencers.div_ceil(pools) <= max && fencers / pools >= min)
        .unwrap_or(lowest)
}

/// Pool index (0-based) for each seed index (0-based).
pub fn serpentine_assignment(fencers: usize, pools: usize) -> Vec<usize> {
    if pools == 0 {
        return Vec::new();
    }
    (0..fencers)
        .map(|seed| {
            let (row, col) = (seed / pools, seed % pools);
            if row % 2 == 0 { col } else { pools - 1 - col }
        })
        .collect()
}

/// Splits a ranked roster into `pool_count` pools.
///
/// Each returned pool lists its fencers in assignment order. Running it
/// twice on the same input gives the same pools.
pub fn distribute(
    ranked: &[Fencer],
    pool_count: usize,
    options: DistributionOptions,
) -> Vec<Vec<FencerId>> {
    if pool_count == 0 || ranked.is_empty() {
        return Vec::new();
    }

    let mut pool_of = serpentine_assignment(ranked.len(), pool_count);
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); pool_count];
    for (seed, &pool) in pool_of.iter().enumerate() {
        members[pool].push(seed);
    }

    if options.any() && pool_count > 1 {
        reduce_collisions(ranked, &mut pool_of, &mut members, options);
    }

    members
        .into_iter()
        .map(|seeds| seeds.into_iter().map(|seed| ranked[seed].id).collect())
        .collect()
}

fn collisions(ranked: &[Fencer], seeds: &[usize], options: DistributionOptions) -> usize {
    seeds
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| seeds[i + 1..].iter().map(move |&b| (a, b)))
        .map(|(a, b)| options.shared(&ranked[a], &ranked[b]))
        .sum()
}

fn reduce_collisions(
    ranked: &[Fencer],
    pool_of: &mut [usize],
    members: &mut [Vec<usize>],
    options: DistributionOptions,
) {
    // Every applied swap strictly lowers the total, so this terminates.
    loop {
        let mut swapped = false;

        // Weakest seeds first, so the head seeds keep their pools when a
        // collision can be fixed further down.
        for seed in (0..ranked.len().saturating_sub(1)).rev() {
            let (pa, pb) = (pool_of[seed], pool_of[seed + 1]);
            if pa.abs_diff(pb) != 1 {
                continue;
            }
            let (Some(slot_a), Some(slot_b)) = (
                members[pa].iter().position(|&s| s == seed),
                members[pb].iter().position(|&s| s == seed + 1),
            ) else {
                continue;
            };

            let before = collisions(ranked, &members[pa], options)
                + collisions(ranked, &members[pb], options);
            members[pa][slot_a] = seed + 1;
            members[pb][slot_b] = seed;
            let after = collisions(ranked, &members[pa], options)
                + collisions(ranked, &members[pb], options);

            if after < before {
                pool_of.swap(seed, seed + 1);
                swapped = true;
                debug!(
                    "Swapped seeds {} and {} between pools {} and {} ({} -> {} collisions)",
                    seed + 1,
                    seed + 2,
                    pa + 1,
                    pb + 1,
                    before,
                    after
                );
            } else {
                members[pa][slot_a] = seed;
                members[pb][slot_b] = seed + 1;
            }
        }

        if !swapped {
            break;
        }
    }
}
