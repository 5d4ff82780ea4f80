//! Pool round: distribution, bout order, indicators and rankings.
//!
//! This module covers everything between check-in and the tableau:
//! - Serpentine distribution of a ranked roster with club/league/nation avoidance
//! - The canonical bout order of a pool
//! - Score entry and per-fencer indicators (victories, touches, index, ratio)
//! - Pool rankings and the overall qualification ranking
//!
//! ## Example
//!
//! ```
//! use touche::pool::{Pool, pool_match_order};
//! use touche::score::{ScoreCap, ScoreSubmission};
//!
//! assert_eq!(pool_match_order(5).len(), 10);
//!
//! let mut pool = Pool::new(1, 1, vec![10, 20, 30], ScoreCap::Limited(5), 1);
//! let first = pool.matches[0].id;
//! pool.submit_score(&ScoreSubmission::new(first, 5, 2)).unwrap();
//! assert_eq!(pool.ranking[0].victories, 1);
//! ```

pub mod distributor;
pub mod errors;
pub mod match_order;
pub mod models;
pub mod ranking;
pub mod stats;

pub use distributor::{
    DistributionOptions, PoolSizeBand, distribute, serpentine_assignment, suggest_pool_count,
};
pub use errors::{PoolError, PoolResult};
pub use match_order::{Pairing, consecutive_bouts, pool_match_order};
pub use models::{Match, Pool, PoolRanking};
pub use ranking::{compare_rankings, overall_ranking, rank_pool, sort_rankings};
pub use stats::{FencerStats, aggregate_all, aggregate_stats};
