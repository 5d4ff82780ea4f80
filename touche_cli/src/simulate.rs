//! Seeded simulation of a whole competition.
//!
//! Outcomes favour the better-ranked fencer without making upsets
//! impossible. The same seed and roster always give the same competition.

use std::{fs, path::Path};

use anyhow::Context;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};
use touche::{
    bout::{Bout, MatchId, MatchStatus},
    competition::{Competition, CompetitionResult},
    fencer::{Fencer, FencerId},
    score::{ScoreCap, ScoreSubmission, Side, Touches},
};

const FIRST_NAMES: [&str; 12] = [
    "Lucie", "Enzo", "Ines", "Hugo", "Camille", "Yannick", "Alice", "Mathis", "Chloe", "Nils",
    "Margaux", "Theo",
];

const LAST_NAMES: [&str; 12] = [
    "Martin", "Bernard", "Dubois", "Lefebvre", "Moreau", "Girard", "Fontaine", "Rousseau",
    "Blanc", "Guerin", "Muller", "Perrin",
];

const CLUBS: [&str; 6] = [
    "Salle Rapiere",
    "Cercle d'Escrime",
    "Lames du Nord",
    "Fleuret Club",
    "Escrime Lyonnaise",
    "Masque de Fer",
];

const NATIONS: [&str; 4] = ["FRA", "ITA", "HUN", "KOR"];

/// Touches a bout is fenced to when the competition sets no cap.
const UNCAPPED_TARGET: Touches = 15;

/// Ranking gap at which the better fencer wins about three bouts out of four.
const RANKING_SCALE: f64 = 10.0;

/// Read a roster from a JSON array of fencers
pub fn load_roster(path: &Path) -> anyhow::Result<Vec<Fencer>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster {}", path.display()))?;
    let fencers: Vec<Fencer> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse roster {}", path.display()))?;

    let absent = fencers.iter().filter(|fencer| !fencer.status.is_active()).count();
    if absent > 0 {
        warn!("{absent} fencers in {} are not checked in", path.display());
    }
    Ok(fencers)
}

/// Drives a competition with random but reproducible results.
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A checked-in roster of `count` fencers, ranked in id order.
    pub fn synthesize_roster(&mut self, count: u32) -> Vec<Fencer> {
        (1..=count)
            .map(|id| {
                let first = FIRST_NAMES[self.rng.random_range(0..FIRST_NAMES.len())];
                let last = LAST_NAMES[self.rng.random_range(0..LAST_NAMES.len())];
                Fencer::new(id, first, last)
                    .with_club(CLUBS[self.rng.random_range(0..CLUBS.len())])
                    .with_nation(NATIONS[self.rng.random_range(0..NATIONS.len())])
                    .with_ranking(id)
                    .checked_in()
            })
            .collect()
    }

    /// Fence every pool round and, when configured, the whole tableau
    pub fn run(&mut self, competition: &mut Competition, pools: Option<usize>) -> CompetitionResult<()> {
        competition.generate_pools(pools)?;
        let rounds = competition.config().pool_rounds;
        for round in 1..=rounds {
            self.fence_pools(competition)?;
            info!("Pool round {round} fenced");
            if round < rounds {
                competition.next_pool_round()?;
            }
        }

        if competition.config().has_direct_elimination {
            competition.generate_tableau()?;
            self.fence_tableau(competition)?;
            info!("Tableau fenced");
        }
        Ok(())
    }

    fn fence_pools(&mut self, competition: &mut Competition) -> CompetitionResult<()> {
        let pending: Vec<(MatchId, FencerId, FencerId)> = competition
            .current_pools()
            .iter()
            .flat_map(|pool| &pool.matches)
            .filter(|m| m.status == MatchStatus::NotStarted)
            .filter_map(|m| Some((m.id, m.fencer_a?, m.fencer_b?)))
            .collect();

        let cap = competition.config().pool_max_score;
        for (id, a, b) in pending {
            let submission = self.bout(competition, id, (a, b), cap);
            competition.submit_score(&submission)?;
        }
        Ok(())
    }

    fn fence_tableau(&mut self, competition: &mut Competition) -> CompetitionResult<()> {
        let cap = competition.config().tableau_max_score;
        loop {
            let Some(node) = competition
                .tableau()
                .and_then(|tableau| tableau.ready_matches().next().cloned())
            else {
                return Ok(());
            };
            let (Some(a), Some(b)) = (node.fencer_a(), node.fencer_b()) else {
                return Ok(());
            };
            let submission = self.bout(competition, node.id(), (a, b), cap);
            competition.submit_score(&submission)?;
        }
    }

    /// Draws the result of one bout.
    fn bout(
        &mut self,
        competition: &Competition,
        id: MatchId,
        (a, b): (FencerId, FencerId),
        cap: ScoreCap,
    ) -> ScoreSubmission {
        let unranked = competition.fencers().len() as u32 + 1;
        let ranking = |fencer: FencerId| {
            competition
                .fencer(fencer)
                .and_then(|fencer| fencer.ranking)
                .unwrap_or(unranked)
        };
        let gap = f64::from(ranking(a)) - f64::from(ranking(b));
        let a_wins = self.rng.random_bool(win_probability(gap));

        let target = cap.limit().unwrap_or(UNCAPPED_TARGET);
        let winner = match cap {
            ScoreCap::Limited(_) => target,
            ScoreCap::Unlimited => self.rng.random_range(1..=target),
        };
        let loser = self.rng.random_range(0..winner);
        let side = if a_wins { Side::A } else { Side::B };
        debug!("Match {id}: {a} vs {b}, side {side:?} wins {winner}-{loser}");

        let (score_a, score_b) = if a_wins { (winner, loser) } else { (loser, winner) };
        ScoreSubmission::new(id, score_a as i32, score_b as i32)
    }
}

/// Chance that the fencer ranked `gap` places below the opponent wins.
fn win_probability(gap: f64) -> f64 {
    1.0 / (1.0 + (gap / RANKING_SCALE * 3f64.ln()).exp())
}
