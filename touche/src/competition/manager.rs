//! Competition manager driving a competition from check-in to the final
//! classification.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::{config::CompetitionConfig, models::CompetitionPhase};
use crate::{
    bout::{Bout, MatchId, MatchLike, MatchStatus},
    fencer::{Fencer, FencerId, FencerStatus, seed_order},
    pool::{Pool, PoolError, PoolRanking, distribute, overall_ranking, suggest_pool_count},
    score::{ScoreIssue, ScoreSubmission, Side, SpecialStatus, ValidationResult, detect_duplicate_matches},
    tableau::{FinalResult, Tableau, TableauError, final_results},
};

/// Competition errors
#[derive(Debug, Error, PartialEq)]
pub enum CompetitionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Fencer {0} is already registered")]
    DuplicateFencer(FencerId),

    #[error("Fencer not found: {0}")]
    FencerNotFound(FencerId),

    #[error("Cannot {operation} during {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: CompetitionPhase,
    },

    #[error("Not enough fencers: need {needed}, have {current}")]
    NotEnoughFencers { needed: usize, current: usize },

    #[error("Cannot split {fencers} fencers into {pools} pools")]
    InvalidPoolCount { fencers: usize, pools: usize },

    #[error("Pool round {0} still has matches to fence")]
    PoolsIncomplete(u32),

    #[error("All {0} pool rounds have been fenced")]
    NoMorePoolRounds(u32),

    #[error("This competition has no direct elimination")]
    DirectEliminationDisabled,

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Tableau(#[from] TableauError),
}

pub type CompetitionResult<T> = Result<T, CompetitionError>;

/// Smallest number of fencers for a pool round or a tableau.
const MIN_FENCERS: usize = 2;

/// One competition: its roster, every pool round and the tableau.
///
/// All state is owned here and changed only through `&mut self`, so a host
/// that shares a competition clones it, works on the clone and swaps it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    config: CompetitionConfig,
    fencers: Vec<Fencer>,
    phase: CompetitionPhase,
    /// Pools of every round, in round then pool order.
    pools: Vec<Pool>,
    tableau: Option<Tableau>,
    next_match_id: MatchId,
}

impl Competition {
    /// Create a new competition in check-in
    pub fn new(config: CompetitionConfig, fencers: Vec<Fencer>) -> CompetitionResult<Self> {
        config.validate().map_err(CompetitionError::InvalidConfig)?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = fencers.iter().find(|fencer| !seen.insert(fencer.id)) {
            return Err(CompetitionError::DuplicateFencer(duplicate.id));
        }

        info!("Created competition with {} fencers", fencers.len());
        Ok(Self {
            config,
            fencers,
            phase: CompetitionPhase::CheckIn,
            pools: Vec::new(),
            tableau: None,
            next_match_id: 1,
        })
    }

    pub fn config(&self) -> &CompetitionConfig {
        &self.config
    }

    pub fn phase(&self) -> CompetitionPhase {
        self.phase
    }

    pub fn fencers(&self) -> &[Fencer] {
        &self.fencers
    }

    pub fn fencer(&self, id: FencerId) -> Option<&Fencer> {
        self.fencers.iter().find(|fencer| fencer.id == id)
    }

    /// Pools of every round fenced so far.
    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Pools of the round being fenced, or of the last round once the
    /// pools are over.
    pub fn current_pools(&self) -> &[Pool] {
        let last_round = self.pools.last().map_or(0, |pool| pool.round);
        let start = self
            .pools
            .iter()
            .position(|pool| pool.round == last_round)
            .unwrap_or(self.pools.len());
        &self.pools[start..]
    }

    pub fn tableau(&self) -> Option<&Tableau> {
        self.tableau.as_ref()
    }

    /// Register a fencer during check-in
    pub fn add_fencer(&mut self, fencer: Fencer) -> CompetitionResult<()> {
        self.require_check_in("add a fencer")?;
        if self.fencer(fencer.id).is_some() {
            return Err(CompetitionError::DuplicateFencer(fencer.id));
        }
        debug!("Registered fencer {} ({})", fencer.id, fencer.display_name());
        self.fencers.push(fencer);
        Ok(())
    }

    pub fn check_in(&mut self, id: FencerId) -> CompetitionResult<()> {
        self.set_status(id, FencerStatus::CheckedIn)
    }

    /// Change a fencer's status during check-in
    pub fn set_status(&mut self, id: FencerId, status: FencerStatus) -> CompetitionResult<()> {
        self.require_check_in("change a fencer's status")?;
        let fencer = self.fencer_mut(id)?;
        fencer.status = status;
        debug!("Fencer {id} is now {status}");
        Ok(())
    }

    /// Active fencers, strongest prior ranking first.
    pub fn roster(&self) -> Vec<&Fencer> {
        let order = seed_order(self.fencers.iter().filter(|fencer| fencer.status.is_active()));
        order.into_iter().filter_map(|id| self.fencer(id)).collect()
    }

    /// Distribute the checked-in fencers into the first pool round
    ///
    /// Without an explicit count, the smallest count fitting the configured
    /// pool size band is used.
    pub fn generate_pools(&mut self, pool_count: Option<usize>) -> CompetitionResult<&[Pool]> {
        self.require_check_in("generate pools")?;
        let ranked: Vec<Fencer> = self.roster().into_iter().cloned().collect();
        self.start_pool_round(1, ranked, pool_count)?;
        Ok(self.current_pools())
    }

    /// Redistribute the active fencers, in overall-ranking order, into the
    /// next pool round
    pub fn next_pool_round(&mut self) -> CompetitionResult<&[Pool]> {
        let round = self.require_pools("start the next pool round")?;
        if !self.current_pools().iter().all(Pool::is_complete) {
            return Err(CompetitionError::PoolsIncomplete(round));
        }
        if round >= self.config.pool_rounds {
            return Err(CompetitionError::NoMorePoolRounds(self.config.pool_rounds));
        }

        let ranked: Vec<Fencer> = self
            .qualified()
            .into_iter()
            .filter_map(|id| self.fencer(id).cloned())
            .collect();
        self.start_pool_round(round + 1, ranked, None)?;
        Ok(self.current_pools())
    }

    fn start_pool_round(
        &mut self,
        round: u32,
        ranked: Vec<Fencer>,
        pool_count: Option<usize>,
    ) -> CompetitionResult<()> {
        let fencers = ranked.len();
        if fencers < MIN_FENCERS {
            return Err(CompetitionError::NotEnoughFencers {
                needed: MIN_FENCERS,
                current: fencers,
            });
        }

        let pools = pool_count.unwrap_or_else(|| suggest_pool_count(fencers, self.config.pool_size));
        if pools == 0 || pools > fencers / MIN_FENCERS {
            return Err(CompetitionError::InvalidPoolCount { fencers, pools });
        }

        for (number, members) in (1..).zip(distribute(&ranked, pools, self.config.distribution)) {
            let pool = Pool::new(
                number,
                round,
                members,
                self.config.pool_max_score,
                self.next_match_id,
            );
            self.next_match_id += pool.matches.len() as MatchId;
            self.pools.push(pool);
        }

        self.phase = CompetitionPhase::Pools { round };
        info!("Pool round {round}: {fencers} fencers in {pools} pools");
        Ok(())
    }

    /// Record a score for a pool or tableau match
    pub fn submit_score(&mut self, submission: &ScoreSubmission) -> CompetitionResult<ValidationResult> {
        let id = submission.match_id;
        let validation = if let Some(round) = self.open_pool_round() {
            self.pool_with_match(round, id)?
                .submit_score(submission)
                .inspect_err(|err| warn!("{err}"))?
        } else if let Some(tableau) = self.tableau.as_mut() {
            let validation = tableau.submit_score(submission)?;
            self.resolve_withdrawn()?;
            validation
        } else {
            return Err(CompetitionError::InvalidPhase {
                operation: "submit a score",
                phase: self.phase,
            });
        };

        self.refresh_phase();
        Ok(validation)
    }

    /// Clear a result; tableau resets also clear the results depending on it
    pub fn reset_match(&mut self, id: MatchId) -> CompetitionResult<()> {
        if let Some(round) = self.open_pool_round() {
            self.pool_with_match(round, id)?.reset_match(id)?;
        } else if let Some(tableau) = self.tableau.as_mut() {
            tableau.reset_match(id)?;
            self.resolve_withdrawn()?;
        } else {
            return Err(CompetitionError::InvalidPhase {
                operation: "reset a match",
                phase: self.phase,
            });
        }

        debug!("Match {id} reset");
        self.refresh_phase();
        Ok(())
    }

    /// Pool round whose scores can still be entered or corrected: the
    /// current one, or the last one of a competition without tableau.
    fn open_pool_round(&self) -> Option<u32> {
        match self.phase {
            CompetitionPhase::Pools { round } => Some(round),
            CompetitionPhase::Finished if self.tableau.is_none() => {
                self.pools.last().map(|pool| pool.round)
            }
            _ => None,
        }
    }

    fn pool_with_match(&mut self, round: u32, id: MatchId) -> CompetitionResult<&mut Pool> {
        self.pools
            .iter_mut()
            .filter(|pool| pool.round == round)
            .find(|pool| pool.find_match(id).is_some())
            .ok_or(CompetitionError::MatchNotFound(id))
    }

    /// Withdraw a fencer; their pending matches are lost by `status`
    pub fn withdraw_fencer(&mut self, id: FencerId, status: SpecialStatus) -> CompetitionResult<()> {
        self.fencer_mut(id)?.status = status.fencer_status();
        info!("Fencer {id} withdrawn ({status})");

        match self.phase {
            CompetitionPhase::Pools { round } => {
                for pool in self.pools.iter_mut().filter(|pool| pool.round == round) {
                    let pending: Vec<ScoreSubmission> = pool
                        .matches
                        .iter()
                        .filter(|m| matches!(m.status, MatchStatus::NotStarted | MatchStatus::InProgress))
                        .filter_map(|m| withdrawal_submission(m, id, status))
                        .collect();
                    for submission in &pending {
                        pool.submit_score(submission)?;
                    }
                }
            }
            CompetitionPhase::Tableau => self.resolve_withdrawn()?,
            CompetitionPhase::CheckIn | CompetitionPhase::Finished => {}
        }

        self.refresh_phase();
        Ok(())
    }

    /// Qualification ranking over every pool round fenced so far
    pub fn overall_ranking(&self) -> Vec<PoolRanking> {
        overall_ranking(&self.pools, &seed_order(&self.fencers))
    }

    /// Active fencers in overall-ranking order.
    fn qualified(&self) -> Vec<FencerId> {
        self.overall_ranking()
            .into_iter()
            .map(|line| line.fencer)
            .filter(|&id| self.fencer(id).is_some_and(|fencer| fencer.status.is_active()))
            .collect()
    }

    /// Seed the tableau from the overall ranking of the active fencers
    pub fn generate_tableau(&mut self) -> CompetitionResult<&Tableau> {
        let round = self.require_pools("generate the tableau")?;
        if !self.config.has_direct_elimination {
            return Err(CompetitionError::DirectEliminationDisabled);
        }
        if !self.current_pools().iter().all(Pool::is_complete) {
            return Err(CompetitionError::PoolsIncomplete(round));
        }
        if round < self.config.pool_rounds {
            info!(
                "Starting the tableau after {round} of {} pool rounds",
                self.config.pool_rounds
            );
        }

        let qualified = self.qualified();
        if qualified.len() < MIN_FENCERS {
            return Err(CompetitionError::NotEnoughFencers {
                needed: MIN_FENCERS,
                current: qualified.len(),
            });
        }

        let tableau = Tableau::generate(
            &qualified,
            self.config.third_place_match,
            self.config.tableau_max_score,
            self.next_match_id,
        );
        self.next_match_id += tableau.nodes().len() as MatchId;
        info!("Competition phase: {} -> {}", self.phase, CompetitionPhase::Tableau);
        self.phase = CompetitionPhase::Tableau;
        Ok(self.tableau.insert(tableau))
    }

    /// Final classification, complete or provisional
    pub fn final_results(&self) -> Vec<FinalResult> {
        let overall: Vec<FencerId> = self.overall_ranking().into_iter().map(|line| line.fencer).collect();
        match &self.tableau {
            Some(tableau) => final_results(tableau, &overall),
            None => final_results(&Tableau::default(), &overall),
        }
    }

    /// Look up any pool or tableau match
    pub fn find_match(&self, id: MatchId) -> Option<MatchLike> {
        self.pools
            .iter()
            .find_map(|pool| pool.find_match(id).cloned().map(MatchLike::from))
            .or_else(|| {
                self.tableau
                    .as_ref()
                    .and_then(|tableau| tableau.find(id))
                    .cloned()
                    .map(MatchLike::from)
            })
    }

    /// Every match of a fencer, pools first, then tableau
    pub fn matches_of(&self, fencer: FencerId) -> Vec<MatchLike> {
        let pool_matches = self
            .pools
            .iter()
            .flat_map(|pool| &pool.matches)
            .filter(|m| m.involves(fencer))
            .cloned()
            .map(MatchLike::from);
        let tableau_matches = self
            .tableau
            .iter()
            .flat_map(|tableau| tableau.nodes())
            .filter(|node| node.involves(fencer))
            .cloned()
            .map(MatchLike::from);
        pool_matches.chain(tableau_matches).collect()
    }

    /// Pairs of fencers meeting twice in the current pool round
    pub fn duplicate_matches(&self) -> Vec<ScoreIssue> {
        detect_duplicate_matches(self.current_pools().iter().flat_map(|pool| &pool.matches))
    }

    fn fencer_mut(&mut self, id: FencerId) -> CompetitionResult<&mut Fencer> {
        self.fencers
            .iter_mut()
            .find(|fencer| fencer.id == id)
            .ok_or(CompetitionError::FencerNotFound(id))
    }

    fn require_check_in(&self, operation: &'static str) -> CompetitionResult<()> {
        match self.phase {
            CompetitionPhase::CheckIn => Ok(()),
            phase => Err(CompetitionError::InvalidPhase { operation, phase }),
        }
    }

    fn require_pools(&self, operation: &'static str) -> CompetitionResult<u32> {
        match self.phase {
            CompetitionPhase::Pools { round } => Ok(round),
            phase => Err(CompetitionError::InvalidPhase { operation, phase }),
        }
    }

    /// Lets the opponents of withdrawn fencers through every ready tableau
    /// match, round after round.
    fn resolve_withdrawn(&mut self) -> CompetitionResult<()> {
        loop {
            let Some(tableau) = self.tableau.as_ref() else {
                return Ok(());
            };
            let next = tableau.ready_matches().find_map(|node| {
                [node.fencer_a, node.fencer_b]
                    .into_iter()
                    .flatten()
                    .find_map(|id| {
                        let status = self.fencer(id).map(|fencer| fencer.status)?;
                        withdrawal_submission(node, id, special_status_for(status)?)
                    })
            });
            let Some(submission) = next else {
                return Ok(());
            };

            debug!("Match {} resolved by withdrawal", submission.match_id);
            if let Some(tableau) = self.tableau.as_mut() {
                tableau.submit_score(&submission)?;
            }
        }
    }

    fn refresh_phase(&mut self) {
        let next = match self.phase {
            CompetitionPhase::Pools { round }
                if !self.config.has_direct_elimination
                    && round >= self.config.pool_rounds
                    && self.current_pools().iter().all(Pool::is_complete) =>
            {
                CompetitionPhase::Finished
            }
            CompetitionPhase::Tableau if self.tableau.as_ref().is_some_and(Tableau::is_complete) => {
                CompetitionPhase::Finished
            }
            CompetitionPhase::Finished => match &self.tableau {
                Some(tableau) if !tableau.is_complete() => CompetitionPhase::Tableau,
                None if !self.current_pools().iter().all(Pool::is_complete) => {
                    CompetitionPhase::Pools {
                        round: self.current_pools().first().map_or(1, |pool| pool.round),
                    }
                }
                _ => CompetitionPhase::Finished,
            },
            phase => phase,
        };

        if next != self.phase {
            info!("Competition phase: {} -> {}", self.phase, next);
            self.phase = next;
        }
    }
}

/// Special status recorded against a fencer who left the competition.
fn special_status_for(status: FencerStatus) -> Option<SpecialStatus> {
    match status {
        FencerStatus::Abandoned => Some(SpecialStatus::Abstention),
        FencerStatus::Excluded => Some(SpecialStatus::Exclusion),
        FencerStatus::Forfeit => Some(SpecialStatus::Forfeit),
        FencerStatus::NotCheckedIn | FencerStatus::CheckedIn => None,
    }
}

/// The submission that hands `bout` to the opponent of `fencer`.
fn withdrawal_submission<B: Bout>(
    bout: &B,
    fencer: FencerId,
    status: SpecialStatus,
) -> Option<ScoreSubmission> {
    let side = if bout.fencer_a() == Some(fencer) {
        Side::A
    } else if bout.fencer_b() == Some(fencer) {
        Side::B
    } else {
        return None;
    };
    Some(ScoreSubmission::special(bout.id(), side, status))
}
