//! Tableau generation, score entry and winner propagation.
//!
//! All nodes live in one flat vector, largest round first:
//!
//! ```text
//! index = (size - round_size) + position
//! ```
//!
//! so a tableau of `size` has `size - 1` main nodes, with the final at
//! `size - 2`. The match for third place, when there is one, sits at
//! `size - 1`.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{
    errors::{TableauError, TableauResult},
    models::{FINAL_ROUND, SEMI_FINAL_ROUND, THIRD_PLACE_ROUND, TableauMatch},
    seeding::{MAX_TABLEAU_SIZE, Seeding, seeding, tableau_size_for},
};
use crate::{
    bout::{Bout, MatchId},
    fencer::FencerId,
    score::{
        ScoreCap, ScoreSubmission, Side, SpecialStatus, ValidationOptions, ValidationResult,
        resolve_submission,
    },
};

/// A direct elimination tableau.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Tableau {
    size: u32,
    /// Qualified fencers in seed order; seed `n` is `entrants[n - 1]`.
    entrants: Vec<FencerId>,
    seeding: Seeding,
    nodes: Vec<TableauMatch>,
    third_place: bool,
}

impl Tableau {
    /// Builds the tableau for an overall ranking.
    ///
    /// Fencers past [`MAX_TABLEAU_SIZE`] are not placed. An empty ranking
    /// yields an empty tableau. Match ids are allocated sequentially from
    /// `first_match_id` in node order.
    pub fn generate(
        ranking: &[FencerId],
        third_place: bool,
        max_score: ScoreCap,
        first_match_id: MatchId,
    ) -> Self {
        if ranking.len() > MAX_TABLEAU_SIZE {
            warn!(
                "{} qualified fencers, only the first {} enter the tableau",
                ranking.len(),
                MAX_TABLEAU_SIZE
            );
        }
        let entrants: Vec<FencerId> = ranking.iter().take(MAX_TABLEAU_SIZE).copied().collect();
        let size = tableau_size_for(entrants.len());
        if size == 0 {
            return Self::default();
        }

        let seeding = seeding(size);
        let size = size as u32;
        let third_place = third_place && size >= SEMI_FINAL_ROUND;

        let mut rounds: Vec<u32> = Vec::new();
        let mut round_size = size;
        while round_size >= FINAL_ROUND {
            rounds.push(round_size);
            round_size /= 2;
        }
        let mut nodes: Vec<TableauMatch> = rounds
            .iter()
            .flat_map(|&round_size| (0..round_size / 2).map(move |position| (round_size, position)))
            .chain(third_place.then_some((THIRD_PLACE_ROUND, 0)))
            .zip(first_match_id..)
            .map(|((round_size, position), id)| {
                TableauMatch::new(id, round_size, position, max_score)
            })
            .collect();

        let seeded = |line: usize| {
            seeding
                .order
                .get(line)
                .and_then(|&seed| entrants.get(seed as usize - 1))
                .copied()
        };
        for (position, node) in nodes.iter_mut().take(size as usize / 2).enumerate() {
            node.fencer_a = seeded(2 * position);
            node.fencer_b = seeded(2 * position + 1);
        }

        let mut tableau = Self {
            size,
            entrants,
            seeding,
            nodes,
            third_place,
        };
        tableau.propagate();

        info!(
            "Generated a tableau of {} for {} fencers ({} byes)",
            tableau.size,
            tableau.entrants.len(),
            tableau.round(size).iter().filter(|node| node.is_bye).count()
        );
        tableau
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn entrants(&self) -> &[FencerId] {
        &self.entrants
    }

    pub fn seeding(&self) -> &Seeding {
        &self.seeding
    }

    pub fn has_third_place(&self) -> bool {
        self.third_place
    }

    /// Every node: main rounds largest first, then third place.
    pub fn nodes(&self) -> &[TableauMatch] {
        &self.nodes
    }

    /// Round sizes from the first round down to the final.
    pub fn round_sizes(&self) -> impl Iterator<Item = u32> + '_ {
        std::iter::successors((self.size >= FINAL_ROUND).then_some(self.size), |&size| {
            (size > FINAL_ROUND).then_some(size / 2)
        })
    }

    /// Index of the node at `position` in the round of `round_size`.
    pub fn index_of(&self, round_size: u32, position: u32) -> Option<usize> {
        if round_size == THIRD_PLACE_ROUND {
            return (self.third_place && position == 0).then_some(self.size as usize - 1);
        }
        let in_tableau = round_size.is_power_of_two()
            && (FINAL_ROUND..=self.size).contains(&round_size)
            && position < round_size / 2;
        in_tableau.then(|| (self.size - round_size + position) as usize)
    }

    pub fn node(&self, round_size: u32, position: u32) -> Option<&TableauMatch> {
        self.index_of(round_size, position).map(|idx| &self.nodes[idx])
    }

    /// Nodes of one round in position order. Empty for unknown rounds.
    pub fn round(&self, round_size: u32) -> &[TableauMatch] {
        match self.index_of(round_size, 0) {
            Some(start) if round_size == THIRD_PLACE_ROUND => &self.nodes[start..=start],
            Some(start) => &self.nodes[start..start + round_size as usize / 2],
            None => &[],
        }
    }

    pub fn final_match(&self) -> Option<&TableauMatch> {
        self.node(FINAL_ROUND, 0)
    }

    pub fn third_place_match(&self) -> Option<&TableauMatch> {
        self.node(THIRD_PLACE_ROUND, 0)
    }

    pub fn find(&self, id: MatchId) -> Option<&TableauMatch> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Nodes waiting for a score.
    pub fn ready_matches(&self) -> impl Iterator<Item = &TableauMatch> {
        self.nodes.iter().filter(|node| node.is_ready())
    }

    /// Tableau winner, once the final is decided.
    pub fn winner(&self) -> Option<FencerId> {
        self.final_match().and_then(|node| node.winner)
    }

    /// True once the final, and the match for third place if it can be
    /// fenced, are decided.
    pub fn is_complete(&self) -> bool {
        self.winner().is_some()
            && self.third_place_match().is_none_or(|node| {
                node.winner.is_some() || (node.fencer_a.is_none() && node.fencer_b.is_none())
            })
    }

    /// Places every decided winner in the node it feeds and settles byes.
    ///
    /// A node whose opponent can no longer arrive (both feeders empty, or a
    /// feeder that is itself empty for good) is a bye. One pass covers byes
    /// chained across several rounds. Fenced results are never overwritten,
    /// and running it again on a settled tableau changes nothing.
    pub fn propagate(&mut self) {
        if self.nodes.is_empty() {
            return;
        }

        // A node is dead when no fencer can ever come out of it.
        let mut dead = vec![false; self.size as usize - 1];
        for idx in 0..self.size as usize / 2 {
            let node = &mut self.nodes[idx];
            dead[idx] = node.fencer_a.is_none() && node.fencer_b.is_none();
            let (empty_a, empty_b) = (node.fencer_a.is_none(), node.fencer_b.is_none());
            settle(node, empty_a, empty_b);
        }

        let mut round_size = self.size / 2;
        while round_size >= FINAL_ROUND {
            for position in 0..round_size / 2 {
                let idx = (self.size - round_size + position) as usize;
                let feeder_a = (self.size - 2 * round_size + 2 * position) as usize;
                let feeder_b = feeder_a + 1;
                dead[idx] = dead[feeder_a] && dead[feeder_b];

                let (winner_a, winner_b) = (self.nodes[feeder_a].winner, self.nodes[feeder_b].winner);
                let node = &mut self.nodes[idx];
                if !is_fenced(node) {
                    node.fencer_a = winner_a;
                    node.fencer_b = winner_b;
                }
                settle(node, dead[feeder_a], dead[feeder_b]);
            }
            round_size /= 2;
        }

        if self.third_place {
            self.fill_third_place(&dead);
        }
    }

    fn fill_third_place(&mut self, dead: &[bool]) {
        let first = (self.size - SEMI_FINAL_ROUND) as usize;
        let semis = [first, first + 1];
        let decided = semis
            .iter()
            .all(|&idx| dead[idx] || self.nodes[idx].winner.is_some());
        let (loser_a, loser_b) = (self.nodes[semis[0]].loser(), self.nodes[semis[1]].loser());

        let idx = self.size as usize - 1;
        let node = &mut self.nodes[idx];
        if is_fenced(node) {
            return;
        }
        if decided {
            node.fencer_a = loser_a;
            node.fencer_b = loser_b;
            settle(node, loser_a.is_none(), loser_b.is_none());
        } else {
            node.fencer_a = None;
            node.fencer_b = None;
            settle(node, false, false);
        }
    }

    /// Records a score and moves the winner on.
    ///
    /// Abstention and forfeit void the touches; exclusion keeps them. In
    /// every case the other fencer advances. Changing the winner of a match
    /// that was already decided resets every match that depended on it.
    pub fn submit_score(&mut self, submission: &ScoreSubmission) -> TableauResult<ValidationResult> {
        let id = submission.match_id;
        let idx = self.position_of(id)?;
        let node = &self.nodes[idx];
        if node.is_bye {
            return Err(TableauError::ByeMatch(id));
        }
        let (Some(fencer_a), Some(fencer_b)) = (node.fencer_a, node.fencer_b) else {
            return Err(TableauError::MatchNotReady(id));
        };

        let keep_touches = submission
            .special
            .is_some_and(|special| special.status == SpecialStatus::Exclusion);
        let rules = ValidationOptions::default();
        let resolved = resolve_submission(submission, node.max_score, rules, keep_touches)
            .map_err(|validation| {
                warn!("Rejected score for tableau match {id}: {validation}");
                TableauError::ScoreRejected(id, validation)
            })?;

        let winner = match resolved.winner {
            Side::A => fencer_a,
            Side::B => fencer_b,
        };
        if node.winner.is_some_and(|previous| previous != winner) {
            self.clear_dependents(idx);
        }

        self.nodes[idx].record(resolved.score_a, resolved.score_b, winner);
        debug!("Tableau match {id} won by fencer {winner}");
        self.propagate();
        Ok(resolved.validation)
    }

    /// Clears a result together with every result that depended on it.
    pub fn reset_match(&mut self, id: MatchId) -> TableauResult<()> {
        let idx = self.position_of(id)?;
        if self.nodes[idx].is_bye {
            return Err(TableauError::ByeMatch(id));
        }
        self.nodes[idx].clear_result();
        self.clear_dependents(idx);
        self.propagate();
        Ok(())
    }

    fn position_of(&self, id: MatchId) -> TableauResult<usize> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or(TableauError::MatchNotFound(id))
    }

    /// Clears the nodes downstream of `idx`: its path to the final, and
    /// third place when the path crosses a semi-final.
    fn clear_dependents(&mut self, idx: usize) {
        let node = &self.nodes[idx];
        if node.is_third_place() {
            return;
        }
        let (mut round_size, mut position) = (node.round_size, node.position);
        let mut through_semi = false;

        while round_size > FINAL_ROUND {
            through_semi |= round_size == SEMI_FINAL_ROUND;
            round_size /= 2;
            position /= 2;
            let parent = (self.size - round_size + position) as usize;
            self.nodes[parent].clear_result();
        }

        if through_semi && self.third_place {
            let idx = self.size as usize - 1;
            self.nodes[idx].clear_result();
        }
    }
}

/// A result entered from a score rather than a bye.
fn is_fenced(node: &TableauMatch) -> bool {
    node.is_finished() && !node.is_bye
}

/// Marks or clears a bye from the node's slots and whether each missing
/// fencer is gone for good.
fn settle(node: &mut TableauMatch, gone_a: bool, gone_b: bool) {
    if is_fenced(node) {
        return;
    }
    let alone = match (node.fencer_a, node.fencer_b) {
        (Some(fencer), None) if gone_b => Some(fencer),
        (None, Some(fencer)) if gone_a => Some(fencer),
        _ => None,
    };
    match alone {
        Some(fencer) => {
            if node.winner != Some(fencer) || !node.is_bye {
                debug!("Fencer {fencer} advances on a bye from match {}", node.id);
            }
            node.mark_bye(fencer);
        }
        None if node.is_bye || node.winner.is_some() => node.clear_result(),
        None => {}
    }
}
