//! Competition report: a text summary for the terminal and a JSON document
//! for other tools.

use std::{fmt, fs, path::Path};

use anyhow::Context;
use serde::Serialize;
use touche::{
    competition::{Competition, CompetitionConfig, CompetitionPhase},
    fencer::{Fencer, FencerId},
    pool::{Pool, PoolRanking},
    tableau::{FinalResult, Tableau},
};

/// Everything a competition produced, ready to be serialized.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub config: &'a CompetitionConfig,
    pub phase: CompetitionPhase,
    pub fencers: &'a [Fencer],
    pub pools: &'a [Pool],
    pub overall_ranking: Vec<PoolRanking>,
    pub tableau: Option<&'a Tableau>,
    pub final_results: Vec<FinalResult>,
}

impl<'a> Report<'a> {
    pub fn new(competition: &'a Competition) -> Self {
        Self {
            config: competition.config(),
            phase: competition.phase(),
            fencers: competition.fencers(),
            pools: competition.pools(),
            overall_ranking: competition.overall_ranking(),
            tableau: competition.tableau(),
            final_results: competition.final_results(),
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn name(&self, id: FencerId) -> String {
        self.fencers
            .iter()
            .find(|fencer| fencer.id == id)
            .map_or_else(|| format!("#{id}"), Fencer::display_name)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Competition {}", self.phase)?;

        for pool in self.pools {
            writeln!(f)?;
            writeln!(f, "Round {} pool {}", pool.round, pool.number)?;
            for line in &pool.ranking {
                writeln!(
                    f,
                    "  {:>2}. {:<24} V {} / M {}  ind {:+}",
                    line.rank,
                    self.name(line.fencer),
                    line.victories,
                    line.matches_played,
                    line.index
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Overall ranking")?;
        for line in &self.overall_ranking {
            writeln!(
                f,
                "  {:>3}. {:<24} V/M {:.3}  ind {:+}  TS {}",
                line.rank,
                self.name(line.fencer),
                line.ratio,
                line.index,
                line.touches_scored
            )?;
        }

        if let Some(tableau) = self.tableau {
            writeln!(f)?;
            writeln!(
                f,
                "Tableau of {} ({} entrants)",
                tableau.size(),
                tableau.entrants().len()
            )?;
            if let Some(winner) = tableau.winner() {
                writeln!(f, "  Winner: {}", self.name(winner))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Final results")?;
        for line in &self.final_results {
            writeln!(
                f,
                "  {:>3}. {:<24} {}",
                line.rank,
                self.name(line.fencer),
                line.stage
            )?;
        }
        Ok(())
    }
}
