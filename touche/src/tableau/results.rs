//! Final classification.
//!
//! Ranks come off the tableau top-down. The final gives ranks 1 and 2, the
//! match for third place ranks 3 and 4, and every earlier round hands one
//! shared rank to all of its losers. Fencers still fencing rank ahead of the
//! losers of their round. Fencers never placed in the tableau follow in
//! overall-ranking order.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

use super::{
    bracket::Tableau,
    models::{FINAL_ROUND, SEMI_FINAL_ROUND, TableauMatch},
};
use crate::fencer::FencerId;

/// Where a fencer's competition ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationStage {
    Winner,
    Final,
    ThirdPlace,
    /// Eliminated in the round with this many fencers.
    Tableau(u32),
    Pools,
}

impl EliminationStage {
    fn for_round(round_size: u32) -> Self {
        if round_size == FINAL_ROUND {
            Self::Final
        } else {
            Self::Tableau(round_size)
        }
    }
}

impl fmt::Display for EliminationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winner => write!(f, "Winner"),
            Self::Final => write!(f, "Final"),
            Self::ThirdPlace => write!(f, "Third place"),
            Self::Tableau(4) => write!(f, "Semi-final"),
            Self::Tableau(8) => write!(f, "Quarter-final"),
            Self::Tableau(size) => write!(f, "Table of {size}"),
            Self::Pools => write!(f, "Pools"),
        }
    }
}

/// A line of the final classification.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FinalResult {
    pub rank: u32,
    pub fencer: FencerId,
    pub stage: EliminationStage,
}

/// Classification built top-down, with the next free rank.
struct Standings {
    order: HashMap<FencerId, usize>,
    next_rank: u32,
    results: Vec<FinalResult>,
}

impl Standings {
    fn new(overall: &[FencerId]) -> Self {
        Self {
            order: overall
                .iter()
                .enumerate()
                .map(|(idx, &fencer)| (fencer, idx))
                .collect(),
            next_rank: 1,
            results: Vec::new(),
        }
    }

    fn is_placed(&self, fencer: FencerId) -> bool {
        self.results.iter().any(|line| line.fencer == fencer)
    }

    /// Fencers not yet placed, in overall-ranking order.
    fn unplaced(&self, fencers: impl IntoIterator<Item = FencerId>) -> Vec<FencerId> {
        let mut fencers: Vec<FencerId> = fencers
            .into_iter()
            .filter(|&fencer| !self.is_placed(fencer))
            .collect();
        fencers.sort_by_key(|fencer| {
            (self.order.get(fencer).copied().unwrap_or(usize::MAX), *fencer)
        });
        fencers.dedup();
        fencers
    }

    /// One rank per fencer, in the given order.
    fn place_each(&mut self, fencers: impl IntoIterator<Item = FencerId>, stage: EliminationStage) {
        for fencer in fencers {
            self.results.push(FinalResult {
                rank: self.next_rank,
                fencer,
                stage,
            });
            self.next_rank += 1;
        }
    }

    /// One shared rank for every fencer.
    fn place_tied(&mut self, fencers: Vec<FencerId>, stage: EliminationStage) {
        let rank = self.next_rank;
        self.next_rank += fencers.len() as u32;
        self.results.extend(
            fencers
                .into_iter()
                .map(|fencer| FinalResult { rank, fencer, stage }),
        );
    }
}

/// Computes the classification from a tableau, complete or not, and the
/// overall ranking used to order tied and undecided fencers and to place the
/// fencers who never entered the tableau.
///
/// Rounds are walked from the final outwards. In each round the fencers still
/// in contention come first, one rank each in overall order, then the losers
/// of that round share the next rank. A fencer whose bout is pending therefore
/// never ranks below someone already eliminated in the same round.
pub fn final_results(tableau: &Tableau, overall: &[FencerId]) -> Vec<FinalResult> {
    let mut standings = Standings::new(overall);

    if let Some(last) = tableau.final_match() {
        match last.winner {
            Some(winner) => {
                standings.place_each([winner], EliminationStage::Winner);
                standings.place_each(last.loser(), EliminationStage::Final);
            }
            None => {
                let finalists =
                    standings.unplaced([last.fencer_a, last.fencer_b].into_iter().flatten());
                standings.place_each(finalists, EliminationStage::Final);
            }
        }
    }

    let mut rounds: Vec<u32> = tableau
        .round_sizes()
        .filter(|&size| size >= SEMI_FINAL_ROUND)
        .collect();
    rounds.reverse();

    for round_size in rounds {
        let stage = EliminationStage::for_round(round_size);
        let mut contenders = Vec::new();
        let mut losers = Vec::new();
        for node in tableau.round(round_size) {
            for fencer in [node.fencer_a, node.fencer_b].into_iter().flatten() {
                if node.loser() == Some(fencer) {
                    losers.push(fencer);
                } else {
                    contenders.push(fencer);
                }
            }
        }

        let contenders = standings.unplaced(contenders);
        standings.place_each(contenders, stage);

        if round_size == SEMI_FINAL_ROUND {
            if let Some(third) = tableau.third_place_match() {
                place_third_place(&mut standings, third);
            }
        }

        let losers = standings.unplaced(losers);
        standings.place_tied(losers, stage);
    }

    let rest = standings.unplaced(overall.iter().chain(tableau.entrants()).copied());
    standings.place_each(rest, EliminationStage::Pools);
    standings.results
}

/// Ranks the match for third place: its result when fenced, otherwise both
/// semi-final losers in overall order.
fn place_third_place(standings: &mut Standings, third: &TableauMatch) {
    let fencers: Vec<FencerId> = match third.winner {
        Some(winner) => [Some(winner), third.loser()].into_iter().flatten().collect(),
        None => standings.unplaced([third.fencer_a, third.fencer_b].into_iter().flatten()),
    };
    standings.place_each(fencers, EliminationStage::ThirdPlace);
}
