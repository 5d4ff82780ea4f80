/// Property-based tests for the progression engine using proptest
///
/// These tests check pool bout order, serpentine distribution, rankings and
/// tableau propagation across randomly generated rosters and results.
use proptest::prelude::*;
use std::collections::BTreeSet;
use touche::{
    fencer::{Fencer, FencerId},
    pool::{DistributionOptions, Pool, distribute, overall_ranking, pool_match_order},
    score::{ScoreCap, ScoreSubmission},
    tableau::{Tableau, final_results, seeding, tableau_size_for},
};

fn roster(count: u32) -> Vec<Fencer> {
    let clubs = ["Salle Rapiere", "Cercle d'Escrime", "Lames du Nord", "Fleuret Club"];
    (1..=count)
        .map(|id| {
            Fencer::new(id, "Fencer", &format!("Number{id}"))
                .with_club(clubs[(id * 7 % 4) as usize])
                .with_ranking(id)
        })
        .collect()
}

// Strategy for a pool score: winner side and loser touches
fn bout_strategy() -> impl Strategy<Value = (bool, i32)> {
    (any::<bool>(), 0i32..5)
}

// Plays ready tableau matches using `choices` until none is left or the
// choices run out.
fn play_tableau(tableau: &mut Tableau, choices: &[(bool, i32)]) {
    for &(a_wins, loser) in choices {
        let Some(id) = tableau.ready_matches().next().map(|node| node.id) else {
            break;
        };
        let submission = if a_wins {
            ScoreSubmission::new(id, 15, loser)
        } else {
            ScoreSubmission::new(id, loser, 15)
        };
        tableau.submit_score(&submission).unwrap();
    }
}

proptest! {
    #[test]
    fn test_match_order_covers_every_pair_once(size in 2usize..=20) {
        let order = pool_match_order(size);
        prop_assert_eq!(order.len(), size * (size - 1) / 2);

        let pairs: BTreeSet<(usize, usize)> = order
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect();
        prop_assert_eq!(pairs.len(), order.len(), "a pair fences twice");
        prop_assert!(order.iter().all(|&(a, b)| a != b && (1..=size).contains(&a) && (1..=size).contains(&b)));
    }

    #[test]
    fn test_match_order_is_deterministic(size in 0usize..=20) {
        prop_assert_eq!(pool_match_order(size), pool_match_order(size));
    }

    #[test]
    fn test_serpentine_pools_are_balanced(fencers in 2u32..=60, pools in 1usize..=8, avoid in any::<bool>()) {
        prop_assume!(pools <= fencers as usize);
        let options = if avoid { DistributionOptions::default() } else { DistributionOptions::none() };
        let split = distribute(&roster(fencers), pools, options);

        prop_assert_eq!(split.len(), pools);
        let sizes: Vec<usize> = split.iter().map(Vec::len).collect();
        let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
        prop_assert!(max - min <= 1, "pool sizes {:?}", sizes);

        let everyone: BTreeSet<FencerId> = split.iter().flatten().copied().collect();
        prop_assert_eq!(everyone.len(), fencers as usize);
        prop_assert_eq!(sizes.iter().sum::<usize>(), fencers as usize);
    }

    #[test]
    fn test_pool_ranking_is_total(size in 2usize..=8, bouts in prop::collection::vec(bout_strategy(), 28)) {
        let members: Vec<FencerId> = (1..=size as u32).collect();
        let mut pool = Pool::new(1, 1, members.clone(), ScoreCap::Limited(5), 1);
        let ids: Vec<_> = pool.matches.iter().map(|m| m.id).collect();
        for (id, &(a_wins, loser)) in ids.into_iter().zip(&bouts) {
            let submission = if a_wins {
                ScoreSubmission::new(id, 5, loser)
            } else {
                ScoreSubmission::new(id, loser, 5)
            };
            pool.submit_score(&submission).unwrap();
        }

        let ranks: Vec<u32> = pool.ranking.iter().map(|line| line.rank).collect();
        prop_assert_eq!(ranks, (1..=size as u32).collect::<Vec<_>>());

        let overall = overall_ranking([&pool], &members);
        let victories: u32 = overall.iter().map(|line| line.victories).sum();
        let defeats: u32 = overall.iter().map(|line| line.defeats).sum();
        prop_assert_eq!(victories, defeats);
        prop_assert_eq!(victories as usize, size * (size - 1) / 2);
        prop_assert_eq!(overall.iter().map(|line| line.index).sum::<i32>(), 0);
    }

    #[test]
    fn test_seeding_tables_are_permutations(exponent in 2u32..=6) {
        let size = 1u32 << exponent;
        let table = seeding(size as usize);
        prop_assert!(table.from_table);

        let mut sorted = table.order.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (1..=size).collect::<Vec<_>>());
        prop_assert!(table.order.chunks(2).all(|pair| pair[0] + pair[1] == size + 1));
    }

    #[test]
    fn test_propagation_is_idempotent(
        entrants in 1u32..=40,
        third_place in any::<bool>(),
        choices in prop::collection::vec(bout_strategy(), 0..64),
    ) {
        let ranking: Vec<FencerId> = (1..=entrants).collect();
        let mut tableau = Tableau::generate(&ranking, third_place, ScoreCap::Limited(15), 1);
        prop_assert_eq!(tableau.size() as usize, tableau_size_for(entrants as usize));
        play_tableau(&mut tableau, &choices);

        let settled = tableau.clone();
        tableau.propagate();
        prop_assert_eq!(&tableau, &settled);
        tableau.propagate();
        prop_assert_eq!(&tableau, &settled);
    }

    #[test]
    fn test_no_fencer_twice_in_a_round(
        entrants in 2u32..=40,
        choices in prop::collection::vec(bout_strategy(), 0..64),
    ) {
        let ranking: Vec<FencerId> = (1..=entrants).collect();
        let mut tableau = Tableau::generate(&ranking, false, ScoreCap::Limited(15), 1);
        play_tableau(&mut tableau, &choices);

        for round_size in tableau.round_sizes() {
            let placed: Vec<FencerId> = tableau
                .round(round_size)
                .iter()
                .flat_map(|node| [node.fencer_a, node.fencer_b])
                .flatten()
                .collect();
            let distinct: BTreeSet<_> = placed.iter().collect();
            prop_assert_eq!(distinct.len(), placed.len(), "round of {}", round_size);
        }
    }

    #[test]
    fn test_complete_tableau_ranks_everyone(entrants in 2u32..=40, third_place in any::<bool>()) {
        let ranking: Vec<FencerId> = (1..=entrants).collect();
        let mut tableau = Tableau::generate(&ranking, third_place, ScoreCap::Limited(15), 1);
        let choices = vec![(true, 7); 64];
        play_tableau(&mut tableau, &choices);
        prop_assert!(tableau.is_complete());

        let results = final_results(&tableau, &ranking);
        prop_assert_eq!(results.len(), entrants as usize);
        prop_assert_eq!(results[0].rank, 1);
        prop_assert_eq!(Some(results[0].fencer), tableau.winner());
        prop_assert!(results.windows(2).all(|pair| pair[0].rank <= pair[1].rank));

        let fencers: BTreeSet<FencerId> = results.iter().map(|line| line.fencer).collect();
        prop_assert_eq!(fencers.len(), entrants as usize);
    }
}
