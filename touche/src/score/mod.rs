//! Scores and their validation.
//!
//! A score is a touch count plus an optional special status (abstention,
//! exclusion, forfeit). Validation never fails outright: it returns a
//! [`ValidationResult`] whose errors must block the submission while the
//! warnings are advisory.
//!
//! ## Example
//!
//! ```
//! use touche::score::{ScoreCap, ValidationOptions, validate_scores};
//!
//! let result = validate_scores(Some(5), Some(0), ScoreCap::Limited(5), ValidationOptions::default());
//! assert!(result.is_valid());
//! assert_eq!(result.warnings.len(), 1);
//! ```

pub mod errors;
pub mod models;
pub mod validator;

pub use errors::{IssueKind, ScoreIssue};
pub use models::{
    Score, ScoreCap, ScoreSubmission, Side, SpecialOutcome, SpecialStatus, Touches,
};
pub use validator::{
    ResolvedScores, ValidationOptions, ValidationResult, detect_duplicate_matches,
    resolve_submission, validate_scores,
};
