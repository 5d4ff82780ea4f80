//! Score validation against format rules.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

use super::{
    errors::ScoreIssue,
    models::{Score, ScoreCap, ScoreSubmission, Side, Touches},
};
use crate::bout::{Bout, MatchStatus};

/// Format rules applied on top of the cap.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidationOptions {
    pub allow_tie: bool,
    /// Warn when the winner did not reach the cap.
    pub check_winner_has_cap: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            allow_tie: false,
            check_winner_has_cap: true,
        }
    }
}

/// Outcome of a validation. Errors block a submission, warnings don't.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<ScoreIssue>,
    pub warnings: Vec<ScoreIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(issue: ScoreIssue) -> Self {
        Self {
            errors: vec![issue],
            warnings: Vec::new(),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Validates a pair of proposed scores.
///
/// Absent scores are valid since they simply have not been entered yet.
pub fn validate_scores(
    score_a: Option<i32>,
    score_b: Option<i32>,
    cap: ScoreCap,
    options: ValidationOptions,
) -> ValidationResult {
    let mut result = ValidationResult::default();
    let (Some(a), Some(b)) = (score_a, score_b) else {
        return result;
    };

    for value in [a, b] {
        if value < 0 {
            result.errors.push(ScoreIssue::InvalidScore { value });
        }
    }
    if !result.is_valid() {
        return result;
    }

    let (a, b) = (a.unsigned_abs(), b.unsigned_abs());
    if let Some(max) = cap.limit() {
        for value in [a, b] {
            if value > max {
                result
                    .errors
                    .push(ScoreIssue::MaxScoreExceeded { value, max });
            }
        }
    }

    let (high, low) = (a.max(b), a.min(b));
    if low == 0 {
        result
            .warnings
            .push(ScoreIssue::UnilateralScore { value: high });
    }

    if a == b {
        if !options.allow_tie {
            result.errors.push(ScoreIssue::TieNotAllowed { value: a });
        }
        return result;
    }

    if let Some(max) = cap.limit().filter(|_| options.check_winner_has_cap) {
        if high < max {
            result
                .warnings
                .push(ScoreIssue::WinnerBelowCap { value: high, max });
        }
    }

    result
}

/// Scores ready to be stored on a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedScores {
    pub score_a: Score,
    pub score_b: Score,
    pub winner: Side,
    /// Always valid; carries the non-blocking warnings.
    pub validation: ValidationResult,
}

/// Turns a submission into the two scores to record.
///
/// A special status skips the tie and winner rules: its side loses and the
/// opponent wins. Touches are kept only when `keep_touches` is set, otherwise
/// both sides are recorded at zero.
///
/// `options.allow_tie` permits equal scores only together with a winner
/// override (priority). Without it a tie is rejected even when a winner is
/// named.
pub fn resolve_submission(
    submission: &ScoreSubmission,
    cap: ScoreCap,
    options: ValidationOptions,
    keep_touches: bool,
) -> Result<ResolvedScores, ValidationResult> {
    if let Some(special) = submission.special {
        let mut values = [0, 0];
        if keep_touches {
            let mut result = ValidationResult::default();
            for (slot, value) in [submission.score_a, submission.score_b].into_iter().enumerate() {
                let value = value.unwrap_or(0);
                if value < 0 {
                    result.errors.push(ScoreIssue::InvalidScore { value });
                    continue;
                }
                let value = value.unsigned_abs();
                if !cap.allows(value) {
                    let max = cap.limit().unwrap_or(value);
                    result
                        .errors
                        .push(ScoreIssue::MaxScoreExceeded { value, max });
                }
                values[slot] = value;
            }
            if !result.is_valid() {
                return Err(result);
            }
        }

        let loser = |value: Touches| Score::special(value, special.status);
        let (score_a, score_b) = match special.side {
            Side::A => (loser(values[0]), Score::victory(values[1])),
            Side::B => (Score::victory(values[0]), loser(values[1])),
        };
        return Ok(ResolvedScores {
            score_a,
            score_b,
            winner: special.side.opposite(),
            validation: ValidationResult::default(),
        });
    }

    let (Some(a), Some(b)) = (submission.score_a, submission.score_b) else {
        return Err(ValidationResult::error(ScoreIssue::MissingScore));
    };

    let options = ValidationOptions {
        allow_tie: options.allow_tie && submission.winner_override.is_some(),
        ..options
    };
    let validation = validate_scores(Some(a), Some(b), cap, options);
    if !validation.is_valid() {
        return Err(validation);
    }

    let (a, b) = (a.unsigned_abs(), b.unsigned_abs());
    let by_touches = if a > b {
        Some(Side::A)
    } else if b > a {
        Some(Side::B)
    } else {
        None
    };
    let winner = match (by_touches, submission.winner_override) {
        (Some(side), Some(chosen)) if side != chosen => {
            let (winner, loser) = match chosen {
                Side::A => (a, b),
                Side::B => (b, a),
            };
            return Err(ValidationResult::error(
                ScoreIssue::WinnerHasLowerScore { winner, loser },
            ));
        }
        (Some(side), _) => side,
        (None, Some(chosen)) => chosen,
        (None, None) => return Err(ValidationResult::error(ScoreIssue::TieNotAllowed { value: a })),
    };

    let (score_a, score_b) = match winner {
        Side::A => (Score::victory(a), Score::defeat(b)),
        Side::B => (Score::defeat(a), Score::victory(b)),
    };
    Ok(ResolvedScores {
        score_a,
        score_b,
        winner,
        validation,
    })
}

/// Reports every non-cancelled match that opposes a pair of fencers already
/// opposed by an earlier match in the list.
pub fn detect_duplicate_matches<'a, B>(matches: impl IntoIterator<Item = &'a B>) -> Vec<ScoreIssue>
where
    B: Bout + 'a,
{
    let mut seen = HashMap::new();
    let mut issues = Vec::new();

    for bout in matches {
        if bout.status() == MatchStatus::Cancelled {
            continue;
        }
        let (Some(a), Some(b)) = (bout.fencer_a(), bout.fencer_b()) else {
            continue;
        };
        let key = (a.min(b), a.max(b));
        match seen.get(&key) {
            Some(&existing) => issues.push(ScoreIssue::DuplicateMatch {
                first: key.0,
                second: key.1,
                existing,
            }),
            None => {
                seen.insert(key, bout.id());
            }
        }
    }

    issues
}
