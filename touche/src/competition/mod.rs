//! Competition orchestration.
//!
//! A [`Competition`] owns the roster and walks it through its phases:
//! - Check-in
//! - One or more pool rounds
//! - The direct elimination tableau (optional)
//! - The final classification
//!
//! ## Example
//!
//! ```
//! use touche::competition::{Competition, CompetitionConfig, CompetitionPhase};
//! use touche::fencer::Fencer;
//!
//! let roster = (1..=10)
//!     .map(|id| Fencer::new(id, "Fencer", &format!("Number{id}")).checked_in())
//!     .collect();
//!
//! let mut competition = Competition::new(CompetitionConfig::default(), roster)?;
//! let pools = competition.generate_pools(None)?;
//! assert_eq!(pools.len(), 2);
//! assert_eq!(competition.phase(), CompetitionPhase::Pools { round: 1 });
//! # Ok::<(), touche::competition::CompetitionError>(())
//! ```

pub mod config;
pub mod manager;
pub mod models;

pub use config::CompetitionConfig;
pub use manager::{Competition, CompetitionError, CompetitionResult};
pub use models::CompetitionPhase;
