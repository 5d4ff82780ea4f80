/// Integration tests for the competition lifecycle
///
/// These tests run whole competitions through check-in, pool rounds, the
/// tableau and the final classification, including withdrawals and
/// corrections.
use touche::{
    bout::{Bout, MatchId, MatchLike, MatchStatus},
    competition::{Competition, CompetitionConfig, CompetitionError, CompetitionPhase},
    fencer::{Fencer, FencerId, FencerStatus},
    pool::{DistributionOptions, PoolSizeBand, distribute},
    score::{ScoreCap, ScoreSubmission, SpecialStatus},
    tableau::EliminationStage,
};

fn roster(count: u32) -> Vec<Fencer> {
    let clubs = ["Salle Rapiere", "Cercle d'Escrime", "Lames du Nord"];
    (1..=count)
        .map(|id| {
            Fencer::new(id, "Fencer", &format!("Number{id}"))
                .with_club(clubs[id as usize % clubs.len()])
                .with_ranking(id)
                .checked_in()
        })
        .collect()
}

/// Scores every pending pool match of the current round, lower id winning.
fn fence_pool_round(competition: &mut Competition) {
    let pending: Vec<(MatchId, FencerId, FencerId)> = competition
        .current_pools()
        .iter()
        .flat_map(|pool| &pool.matches)
        .filter(|m| m.status == MatchStatus::NotStarted)
        .filter_map(|m| Some((m.id, m.fencer_a?, m.fencer_b?)))
        .collect();
    for (id, a, b) in pending {
        let submission = if a < b {
            ScoreSubmission::new(id, 5, 3)
        } else {
            ScoreSubmission::new(id, 3, 5)
        };
        competition.submit_score(&submission).unwrap();
    }
}

/// Scores every ready tableau match, lower id winning.
fn fence_tableau(competition: &mut Competition) {
    loop {
        let Some(node) = competition
            .tableau()
            .and_then(|tableau| tableau.ready_matches().next().cloned())
        else {
            break;
        };
        let submission = if node.fencer_a < node.fencer_b {
            ScoreSubmission::new(node.id, 15, 10)
        } else {
            ScoreSubmission::new(node.id, 10, 15)
        };
        competition.submit_score(&submission).unwrap();
    }
}

#[test]
fn test_full_competition() {
    let mut competition = Competition::new(CompetitionConfig::default(), roster(12)).unwrap();
    competition.set_status(12, FencerStatus::NotCheckedIn).unwrap();

    let pools = competition.generate_pools(None).unwrap();
    assert_eq!(pools.len(), 2);
    assert_eq!(pools.iter().map(|pool| pool.size()).sum::<usize>(), 11);

    fence_pool_round(&mut competition);
    assert_eq!(competition.phase(), CompetitionPhase::Pools { round: 1 });
    assert!(matches!(
        competition.next_pool_round(),
        Err(CompetitionError::NoMorePoolRounds(1))
    ));

    let tableau = competition.generate_tableau().unwrap();
    assert_eq!(tableau.size(), 16);
    assert_eq!(tableau.entrants().len(), 11);
    assert_eq!(competition.phase(), CompetitionPhase::Tableau);

    fence_tableau(&mut competition);
    assert_eq!(competition.phase(), CompetitionPhase::Finished);

    let results = competition.final_results();
    assert_eq!(results.len(), 11);
    assert_eq!(results[0].fencer, 1);
    assert_eq!(results[0].stage, EliminationStage::Winner);
    assert_eq!(results[1].rank, 2);
    assert_eq!(results[2].rank, 3);
    assert_eq!(results[3].rank, 3);
    assert!(results.iter().all(|line| line.fencer != 12));
}

#[test]
fn test_withdrawal_during_the_tableau() {
    let mut competition = Competition::new(CompetitionConfig::default(), roster(8)).unwrap();
    competition.generate_pools(Some(1)).unwrap();
    fence_pool_round(&mut competition);
    competition.generate_tableau().unwrap();

    // Seed 1 meets seed 8 first; seed 1 leaves and seed 8 goes through.
    competition.withdraw_fencer(1, SpecialStatus::Abstention).unwrap();
    let first = competition.tableau().unwrap().round(8)[0].clone();
    assert_eq!(first.winner, Some(8));
    assert!(first.score_a.is_some_and(|score| score.is_abstention()));
    assert_eq!(competition.fencer(1).unwrap().status, FencerStatus::Abandoned);

    fence_tableau(&mut competition);
    let results = competition.final_results();
    let withdrawn = results.iter().find(|line| line.fencer == 1).unwrap();
    assert_eq!(withdrawn.rank, 5);
    assert_eq!(withdrawn.stage, EliminationStage::Tableau(8));
}

#[test]
fn test_excluded_fencer_loses_every_later_match() {
    let config = CompetitionConfig {
        third_place_match: true,
        ..CompetitionConfig::default()
    };
    let mut competition = Competition::new(config, roster(4)).unwrap();
    competition.generate_pools(Some(1)).unwrap();
    fence_pool_round(&mut competition);
    competition.generate_tableau().unwrap();

    // Seed 2 wins their semi-final and is then excluded before the final.
    let semi = competition.tableau().unwrap().round(4)[1].clone();
    let submission = if semi.fencer_a == Some(2) {
        ScoreSubmission::new(semi.id, 15, 4)
    } else {
        ScoreSubmission::new(semi.id, 4, 15)
    };
    competition.submit_score(&submission).unwrap();
    competition.withdraw_fencer(2, SpecialStatus::Exclusion).unwrap();

    let tableau = competition.tableau().unwrap();
    assert_eq!(tableau.final_match().unwrap().status, MatchStatus::NotStarted);

    fence_tableau(&mut competition);
    let tableau = competition.tableau().unwrap();
    assert_eq!(tableau.winner(), Some(1));
    assert_eq!(competition.phase(), CompetitionPhase::Finished);
}

#[test]
fn test_two_pool_rounds() {
    let config = CompetitionConfig {
        pool_rounds: 2,
        ..CompetitionConfig::default()
    };
    let mut competition = Competition::new(config, roster(10)).unwrap();
    competition.generate_pools(None).unwrap();

    assert_eq!(
        competition.next_pool_round().unwrap_err(),
        CompetitionError::PoolsIncomplete(1)
    );
    fence_pool_round(&mut competition);

    competition.withdraw_fencer(10, SpecialStatus::Forfeit).unwrap();
    let second = competition.next_pool_round().unwrap();
    assert_eq!(second.iter().map(|pool| pool.size()).sum::<usize>(), 9);
    assert!(second.iter().all(|pool| pool.round == 2));
    assert_eq!(competition.phase(), CompetitionPhase::Pools { round: 2 });

    fence_pool_round(&mut competition);
    let ranking = competition.overall_ranking();
    let first = ranking.iter().find(|line| line.fencer == 1).unwrap();
    assert_eq!(first.defeats, 0);
    assert!(first.matches_played > 4);
    assert_eq!(ranking[0].defeats, 0);
    assert_eq!(competition.pools().len(), 4);
}

#[test]
fn test_pools_only_competition() {
    let config = CompetitionConfig {
        has_direct_elimination: false,
        ..CompetitionConfig::default()
    };
    let mut competition = Competition::new(config, roster(6)).unwrap();
    competition.generate_pools(None).unwrap();
    fence_pool_round(&mut competition);
    assert_eq!(competition.phase(), CompetitionPhase::Finished);
    assert_eq!(
        competition.generate_tableau().unwrap_err(),
        CompetitionError::InvalidPhase {
            operation: "generate the tableau",
            phase: CompetitionPhase::Finished
        }
    );

    let results = competition.final_results();
    assert_eq!(
        results.iter().map(|line| (line.rank, line.fencer)).collect::<Vec<_>>(),
        vec![(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6)]
    );
    assert!(results.iter().all(|line| line.stage == EliminationStage::Pools));

    // A correction reopens the pools.
    let first = competition.current_pools()[0].matches[0].id;
    competition.reset_match(first).unwrap();
    assert_eq!(competition.phase(), CompetitionPhase::Pools { round: 1 });
    fence_pool_round(&mut competition);
    assert_eq!(competition.phase(), CompetitionPhase::Finished);
}

#[test]
fn test_affiliation_avoidance_in_competition() {
    fn same_club_pairs(fencers: &[Fencer], pools: &[Vec<FencerId>]) -> usize {
        let club = |id: FencerId| {
            fencers
                .iter()
                .find(|fencer| fencer.id == id)
                .and_then(|fencer| fencer.club.clone())
        };
        pools
            .iter()
            .map(|pool| {
                pool.iter()
                    .enumerate()
                    .flat_map(|(i, &a)| pool[i + 1..].iter().map(move |&b| (a, b)))
                    .filter(|&(a, b)| club(a) == club(b))
                    .count()
            })
            .sum()
    }

    let config = CompetitionConfig {
        pool_size: PoolSizeBand { min: 3, max: 4 },
        distribution: DistributionOptions::default(),
        ..CompetitionConfig::default()
    };
    let fencers = roster(9);
    let mut competition = Competition::new(config, fencers.clone()).unwrap();
    let pools: Vec<Vec<FencerId>> = competition
        .generate_pools(None)
        .unwrap()
        .iter()
        .map(|pool| pool.fencers.clone())
        .collect();
    assert_eq!(pools.len(), 3);
    assert!(pools.iter().all(|pool| pool.len() == 3));

    let plain = distribute(&fencers, 3, DistributionOptions::none());
    assert!(same_club_pairs(&fencers, &pools) < same_club_pairs(&fencers, &plain));
}

#[test]
fn test_history_and_lookup() {
    let mut competition = Competition::new(CompetitionConfig::default(), roster(4)).unwrap();
    competition.generate_pools(Some(1)).unwrap();
    fence_pool_round(&mut competition);
    competition.generate_tableau().unwrap();
    fence_tableau(&mut competition);

    let history = competition.matches_of(1);
    let pool_bouts = history.iter().filter(|m| matches!(m, MatchLike::Pool(_))).count();
    let tableau_bouts = history.iter().filter(|m| matches!(m, MatchLike::Tableau(_))).count();
    assert_eq!(pool_bouts, 3);
    assert_eq!(tableau_bouts, 2);
    assert!(history.iter().all(|m| m.winner() == Some(1)));

    let last = history.last().unwrap();
    let found = competition.find_match(last.id()).unwrap();
    assert_eq!(&found, last);
}

#[test]
fn test_score_rejection_is_reported() {
    let mut competition = Competition::new(CompetitionConfig::default(), roster(5)).unwrap();
    competition.generate_pools(Some(1)).unwrap();
    let id = competition.current_pools()[0].matches[0].id;

    let err = competition
        .submit_score(&ScoreSubmission::new(id, 6, 2))
        .unwrap_err();
    assert!(matches!(err, CompetitionError::Pool(_)));
    assert!(err.to_string().contains("exceeds"));

    let validation = competition.submit_score(&ScoreSubmission::new(id, 5, 0)).unwrap();
    assert!(validation.is_valid());
    assert_eq!(validation.warnings.len(), 1);
    assert_eq!(competition.config().pool_max_score, ScoreCap::Limited(5));
}
