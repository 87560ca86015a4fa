//! Property-based tests for the search engine.
//!
//! These tests check the bookkeeping of the tree, the ordering of shaped
//! rewards and that a seeded search is reproducible.

mod common;

use common::Fixed;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spire_core::{Outcome, Vitals};
use spire_mcts::{
    games::Skirmish, Evaluator, Mcts, MctsConfig, RewardWeights, SearchResult, ShapedReward,
};

// =============================================================================
// Strategies for generating test inputs
// =============================================================================

fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Small budgets keep the suite fast.
fn arb_iterations() -> impl Strategy<Value = usize> {
    1usize..120
}

fn arb_vitals() -> impl Strategy<Value = Vitals> {
    (1u32..100, 1u32..200).prop_flat_map(|(player_max, opponent_max)| {
        (0..=player_max, 0..=opponent_max).prop_map(move |(player, opponent)| Vitals {
            player_health: player,
            player_max_health: player_max,
            opponent_health: opponent,
            opponent_max_health: opponent_max,
        })
    })
}

fn search_skirmish(seed: u64, iterations: usize) -> SearchResult {
    let combat = Skirmish::default();
    let live = combat.starter(seed);
    let mut mcts = Mcts::new(
        MctsConfig::with_iterations(iterations),
        ShapedReward::default(),
        ChaCha8Rng::seed_from_u64(seed),
    );
    mcts.run(&combat, &live)
}

// =============================================================================
// Tree bookkeeping
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The root is visited exactly once per iteration.
    #[test]
    fn prop_root_visits_equal_iterations(seed in arb_seed(), iterations in arb_iterations()) {
        let result = search_skirmish(seed, iterations);
        prop_assert_eq!(result.root_visits() as usize, iterations);
        prop_assert_eq!(result.stats.rollouts, iterations);
    }

    /// Every iteration ends at exactly one node, so the visits a node holds
    /// beyond its children's sum add up to the iteration count.
    #[test]
    fn prop_visits_are_conserved(seed in arb_seed(), iterations in arb_iterations()) {
        let result = search_skirmish(seed, iterations);
        let tree = &result.tree;

        let mut leaf_visits = 0u64;
        for id in tree.ids() {
            let node = tree.get(id);
            let child_visits: u32 = tree
                .children(id)
                .iter()
                .map(|(_, child)| tree.get(*child).visit_count)
                .sum();
            prop_assert!(
                node.visit_count >= child_visits,
                "node {:?} has {} visits but its children have {}",
                id,
                node.visit_count,
                child_visits
            );
            leaf_visits += u64::from(node.visit_count - child_visits);
        }
        prop_assert_eq!(leaf_visits, iterations as u64);
    }

    /// Each non-root node was created by one expansion.
    #[test]
    fn prop_one_node_per_expansion(seed in arb_seed(), iterations in arb_iterations()) {
        let result = search_skirmish(seed, iterations);
        prop_assert_eq!(result.tree.len(), result.stats.expansions + 1);
    }

    /// Same seed, same tree.
    #[test]
    fn prop_deterministic(seed in arb_seed(), iterations in arb_iterations()) {
        let first = search_skirmish(seed, iterations);
        let second = search_skirmish(seed, iterations);
        prop_assert_eq!(first.tree, second.tree);
        prop_assert_eq!(first.stats, second.stats);
    }
}

// =============================================================================
// Reward shaping
// =============================================================================

proptest! {
    /// Any win outscores any loss with the default weights.
    #[test]
    fn prop_win_beats_loss(win in arb_vitals(), loss in arb_vitals()) {
        let reward = ShapedReward::default();
        let won = reward.evaluate(&Fixed, &(Some(Outcome::Win), win));
        let lost = reward.evaluate(&Fixed, &(Some(Outcome::Loss), loss));
        prop_assert!(won > lost, "win {} <= loss {}", won, lost);
    }

    /// With weights where a win dominates, any win outscores any unfinished rollout.
    #[test]
    fn prop_win_beats_unfinished(win in arb_vitals(), ongoing in arb_vitals()) {
        let weights = RewardWeights {
            win_base: 1.5,
            ..Default::default()
        };
        prop_assert!(weights.win_dominates_ongoing());

        let reward = ShapedReward::new(weights);
        let won = reward.evaluate(&Fixed, &(Some(Outcome::Win), win));
        let unfinished = reward.evaluate(&Fixed, &(None, ongoing));
        prop_assert!(won > unfinished, "win {} <= unfinished {}", won, unfinished);
    }

    /// Scoring is a pure function of the snapshot.
    #[test]
    fn prop_evaluation_is_idempotent(
        vitals in arb_vitals(),
        outcome in prop_oneof![Just(None), Just(Some(Outcome::Win)), Just(Some(Outcome::Loss))]
    ) {
        let reward = ShapedReward::default();
        let snapshot = (outcome, vitals);
        let first = reward.evaluate(&Fixed, &snapshot);
        let second = reward.evaluate(&Fixed, &snapshot);
        prop_assert_eq!(first.to_bits(), second.to_bits());
        prop_assert!(first >= 0.0 && first <= 1.0, "reward {} outside [0, 1]", first);
    }
}

#[test]
fn test_default_weights_let_unfinished_rollouts_tie_a_weak_win() {
    let weights = RewardWeights::default();
    assert!(weights.win_dominates_loss());
    assert!(!weights.win_dominates_ongoing());
}
