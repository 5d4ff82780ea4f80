//! Direct elimination tableau.
//!
//! This module provides:
//! - FIE seed placement for tableaus of 4 to 64
//! - Tableau generation with byes for missing seeds
//! - Score entry with winner propagation, including byes chained over rounds
//! - An optional match for third place fed by the semi-final losers
//! - The final classification with tied ranks per round
//!
//! ## Example
//!
//! ```
//! use touche::score::{ScoreCap, ScoreSubmission};
//! use touche::tableau::{Tableau, final_results};
//!
//! let ranking = vec![11, 12, 13, 14, 15];
//! let mut tableau = Tableau::generate(&ranking, false, ScoreCap::Limited(15), 1);
//! assert_eq!(tableau.size(), 8);
//!
//! // Seeds 1, 2 and 3 go straight through to the semi-finals.
//! assert_eq!(tableau.round(8).iter().filter(|node| node.is_bye).count(), 3);
//!
//! let id = tableau.ready_matches().next().unwrap().id;
//! tableau.submit_score(&ScoreSubmission::new(id, 15, 9)).unwrap();
//!
//! let results = final_results(&tableau, &ranking);
//! assert_eq!(results.len(), 5);
//! ```

pub mod bracket;
pub mod errors;
pub mod models;
pub mod results;
pub mod seeding;

pub use bracket::Tableau;
pub use errors::{TableauError, TableauResult};
pub use models::{FINAL_ROUND, SEMI_FINAL_ROUND, THIRD_PLACE_ROUND, TableauMatch};
pub use results::{EliminationStage, FinalResult, final_results};
pub use seeding::{
    MAX_TABLEAU_SIZE, MIN_TABLEAU_SIZE, Seeding, is_supported_size, seeding, tableau_size_for,
};
