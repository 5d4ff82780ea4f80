//! # Touche
//!
//! A fencing competition progression engine: it turns a checked-in roster
//! into pools, pool rankings, a seeded direct elimination tableau and a final
//! classification.
//!
//! The engine is synchronous and performs no I/O. Every operation works on
//! data owned by the caller, and rerunning a computation on the same input
//! gives the same output.
//!
//! ## Flow
//!
//! - **Check-in**: fencers are registered and checked in
//! - **Pools**: serpentine distribution, round-robin bouts, pool rankings
//! - **Overall ranking**: statistics over every pool round, used as seeding
//! - **Tableau**: FIE seed placement, byes, winner propagation
//! - **Classification**: final ranks with ties per elimination round
//!
//! ## Core Modules
//!
//! - [`score`]: Scores, special statuses and validation
//! - [`bout`]: The [`Bout`] trait shared by pool and tableau matches
//! - [`pool`]: Pool distribution, bout order, indicators and rankings
//! - [`tableau`]: Seeding, generation, propagation and final results
//! - [`competition`]: Phase-by-phase orchestration
//!
//! ## Example
//!
//! ```
//! use touche::pool::pool_match_order;
//! use touche::tableau::seeding;
//!
//! assert_eq!(pool_match_order(7).len(), 21);
//! assert_eq!(seeding(8).order, vec![1, 8, 5, 4, 3, 6, 7, 2]);
//! ```

/// Shared behaviour of pool and tableau matches.
pub mod bout;
pub use bout::{Bout, MatchId, MatchLike, MatchOutcome, MatchResult, MatchStatus, resolve_outcome};

/// Competition orchestration, configuration and phases.
pub mod competition;
pub use competition::{
    Competition, CompetitionConfig, CompetitionError, CompetitionPhase, CompetitionResult,
};

/// Competitors and their status.
pub mod fencer;
pub use fencer::{Fencer, FencerId, FencerStatus, seed_order};

/// Pools and rankings.
pub mod pool;
pub use pool::{Match, Pool, PoolRanking};

/// Scores and validation.
pub mod score;
pub use score::{Score, ScoreCap, ScoreSubmission, SpecialStatus, ValidationResult};

/// Direct elimination.
pub mod tableau;
pub use tableau::{EliminationStage, FinalResult, Tableau, TableauMatch};
