/// Integration tests for the pool phase
///
/// These tests drive pools from distribution to the overall ranking,
/// through score entry, priority wins and special statuses.
use touche::{
    bout::{Bout, MatchStatus},
    fencer::Fencer,
    pool::{
        DistributionOptions, Pool, consecutive_bouts, distribute, overall_ranking,
        pool_match_order,
    },
    score::{ScoreCap, ScoreIssue, ScoreSubmission, Side, SpecialStatus, detect_duplicate_matches},
};

fn ranked_roster(count: u32) -> Vec<Fencer> {
    (1..=count)
        .map(|id| {
            Fencer::new(id, "Fencer", &format!("Number{id}"))
                .with_ranking(id)
                .checked_in()
        })
        .collect()
}

/// Fences every bout of a pool, the fencer with the lower id winning 5-`n`
/// where `n` is the winner's id modulo 5.
fn fence_by_id(pool: &mut Pool) {
    let bouts: Vec<_> = pool
        .matches
        .iter()
        .map(|m| (m.id, m.fencer_a.unwrap(), m.fencer_b.unwrap()))
        .collect();
    for (id, a, b) in bouts {
        let loser_touches = (a.min(b) % 5) as i32;
        let submission = if a < b {
            ScoreSubmission::new(id, 5, loser_touches)
        } else {
            ScoreSubmission::new(id, loser_touches, 5)
        };
        pool.submit_score(&submission).unwrap();
    }
}

#[test]
fn test_serpentine_twenty_one_fencers() {
    let pools = distribute(&ranked_roster(21), 3, DistributionOptions::none());

    // Rank 1, 2, 3 go to pools 1, 2, 3; rank 4, 5, 6 come back 3, 2, 1.
    assert_eq!(pools[0][0], 1);
    assert_eq!(pools[1][0], 2);
    assert_eq!(pools[2][0], 3);
    assert_eq!(pools[2][1], 4);
    assert_eq!(pools[1][1], 5);
    assert_eq!(pools[0][1], 6);
    assert_eq!(pools[0][2], 7);
    assert!(pools.iter().all(|pool| pool.len() == 7));
}

#[test]
fn test_full_pool_ranking() {
    let mut pool = Pool::new(1, 1, vec![1, 2, 3, 4, 5], ScoreCap::Limited(5), 1);
    assert_eq!(pool.matches.len(), 10);
    fence_by_id(&mut pool);
    assert!(pool.is_complete());

    let order: Vec<_> = pool.ranking.iter().map(|line| line.fencer).collect();
    assert_eq!(order, vec![1, 2, 3, 4, 5]);

    let leader = &pool.ranking[0];
    assert_eq!(leader.victories, 4);
    assert_eq!(leader.defeats, 0);
    assert_eq!(leader.touches_scored, 20);
    assert_eq!(leader.touches_received, 4);
    assert_eq!(leader.index, 16);
    assert!((leader.ratio - 1.0).abs() < f64::EPSILON);

    let last = &pool.ranking[4];
    assert_eq!(last.victories, 0);
    assert_eq!(last.rank, 5);
}

#[test]
fn test_match_order_follows_positions() {
    let pool = Pool::new(2, 1, vec![40, 10, 30, 20, 50, 60], ScoreCap::Limited(5), 1);
    let expected: Vec<_> = pool_match_order(6)
        .into_iter()
        .map(|(a, b)| (Some(pool.fencers[a - 1]), Some(pool.fencers[b - 1])))
        .collect();
    let actual: Vec<_> = pool.matches.iter().map(|m| (m.fencer_a, m.fencer_b)).collect();
    assert_eq!(actual, expected);
    assert_eq!(consecutive_bouts(&pool_match_order(6)), 0);
    assert!(pool.matches.iter().all(|m| m.pool_number == 2));
}

#[test]
fn test_priority_win_on_equal_scores() {
    let mut pool = Pool::new(1, 1, vec![1, 2], ScoreCap::Limited(5), 1);
    let id = pool.matches[0].id;

    let tie = pool.submit_score(&ScoreSubmission::new(id, 3, 3));
    assert!(tie.is_err());
    assert_eq!(pool.matches[0].status, MatchStatus::NotStarted);

    let validation = pool
        .submit_score(&ScoreSubmission::new(id, 3, 3).with_winner(Side::B))
        .unwrap();
    assert!(validation.is_valid());
    assert_eq!(pool.matches[0].winner(), Some(2));
    assert_eq!(pool.ranking[0].fencer, 2);
    assert_eq!(pool.ranking[0].index, 0);
}

#[test]
fn test_exclusion_counts_as_defeat_with_touches() {
    let mut pool = Pool::new(1, 1, vec![1, 2, 3], ScoreCap::Limited(5), 1);
    let id = pool.matches.iter().find(|m| m.involves(1) && m.involves(2)).unwrap().id;
    let side = if pool.find_match(id).unwrap().fencer_a == Some(1) {
        Side::A
    } else {
        Side::B
    };
    let (own, other) = (4, 2);
    let (score_a, score_b) = if side == Side::A { (own, other) } else { (other, own) };
    let submission = ScoreSubmission {
        score_a: Some(score_a),
        score_b: Some(score_b),
        ..ScoreSubmission::special(id, side, SpecialStatus::Exclusion)
    };
    pool.submit_score(&submission).unwrap();

    let line = pool.ranking.iter().find(|line| line.fencer == 1).unwrap();
    assert_eq!(line.defeats, 1);
    assert_eq!(line.touches_scored, 4);
    assert_eq!(line.touches_received, 2);
}

#[test]
fn test_overall_ranking_across_pools() {
    let fencers = ranked_roster(10);
    let split = distribute(&fencers, 2, DistributionOptions::none());
    let mut pools: Vec<Pool> = split
        .into_iter()
        .zip(1..)
        .map(|(members, number)| Pool::new(number, 1, members, ScoreCap::Limited(5), number * 100))
        .collect();
    for pool in &mut pools {
        fence_by_id(pool);
    }

    let seeds: Vec<_> = fencers.iter().map(|fencer| fencer.id).collect();
    let ranking = overall_ranking(&pools, &seeds);
    assert_eq!(ranking.len(), 10);

    // Both pool winners are unbeaten; the better index comes first.
    assert_eq!(ranking[0].victories, 4);
    assert_eq!(ranking[1].victories, 4);
    assert!(ranking[0].index >= ranking[1].index);
    assert_eq!(
        ranking.iter().map(|line| line.rank).collect::<Vec<_>>(),
        (1..=10).collect::<Vec<_>>()
    );
}

#[test]
fn test_duplicate_detection_across_pools() {
    let first = Pool::new(1, 1, vec![1, 2, 3], ScoreCap::Limited(5), 1);
    let second = Pool::new(2, 1, vec![3, 4, 1], ScoreCap::Limited(5), 10);
    let issues = detect_duplicate_matches(first.matches.iter().chain(&second.matches));
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        issues[0],
        ScoreIssue::DuplicateMatch { first: 1, second: 3, .. }
    ));
}
