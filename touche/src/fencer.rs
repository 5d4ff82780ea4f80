//! Competitor entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fencer identifier, stable for the whole competition.
pub type FencerId = u32;

/// Where a fencer stands with respect to the competition.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FencerStatus {
    #[default]
    NotCheckedIn,
    CheckedIn,
    /// Did not show up or gave the competition away.
    Forfeit,
    /// Withdrew during the competition (injury, abstention).
    Abandoned,
    /// Removed by the referee (black card).
    Excluded,
}

impl FencerStatus {
    /// Whether the fencer can still be drawn into pools or the tableau.
    pub fn is_active(self) -> bool {
        matches!(self, Self::CheckedIn)
    }
}

impl fmt::Display for FencerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NotCheckedIn => "not checked in",
            Self::CheckedIn => "checked in",
            Self::Forfeit => "forfeit",
            Self::Abandoned => "abandoned",
            Self::Excluded => "excluded",
        };
        write!(f, "{repr}")
    }
}

/// A competitor.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Fencer {
    pub id: FencerId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub nation: Option<String>,
    /// Prior ranking, lower is stronger. Unranked fencers seed last.
    #[serde(default)]
    pub ranking: Option<u32>,
    #[serde(default)]
    pub status: FencerStatus,
}

impl Fencer {
    pub fn new(id: FencerId, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            club: None,
            league: None,
            nation: None,
            ranking: None,
            status: FencerStatus::NotCheckedIn,
        }
    }

    pub fn with_club(mut self, club: &str) -> Self {
        self.club = Some(club.to_string());
        self
    }

    pub fn with_league(mut self, league: &str) -> Self {
        self.league = Some(league.to_string());
        self
    }

    pub fn with_nation(mut self, nation: &str) -> Self {
        self.nation = Some(nation.to_string());
        self
    }

    pub fn with_ranking(mut self, ranking: u32) -> Self {
        self.ranking = Some(ranking);
        self
    }

    pub fn checked_in(mut self) -> Self {
        self.status = FencerStatus::CheckedIn;
        self
    }

    /// Display name in the usual "LAST First" form.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name.to_uppercase(), self.first_name)
    }
}

impl fmt::Display for Fencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Orders a roster by prior ranking, unranked fencers last, keeping roster
/// order among equals.
pub fn seed_order<'a>(fencers: impl IntoIterator<Item = &'a Fencer>) -> Vec<FencerId> {
    let mut ordered: Vec<(usize, &Fencer)> = fencers.into_iter().enumerate().collect();
    ordered.sort_by_key(|(idx, fencer)| (fencer.ranking.is_none(), fencer.ranking, *idx));
    ordered.into_iter().map(|(_, fencer)| fencer.id).collect()
}
