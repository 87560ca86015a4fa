//! End-to-end decisions on hand-built combats and the skirmish.

mod common;

use common::{Broke, Finished, Fork, ForkState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spire_core::{Action, Combat};
use spire_mcts::{
    catalog, games::Skirmish, Agent, Decision, Mcts, MctsAgent, MctsConfig, NodeId,
    ShapedReward,
};

fn agent(iterations: usize, seed: u64) -> MctsAgent<ChaCha8Rng> {
    MctsAgent::new(
        MctsConfig::with_iterations(iterations),
        ChaCha8Rng::seed_from_u64(seed),
    )
}

#[test]
fn test_terminal_root_ends_turn_without_searching() {
    let decision = agent(50, 0).decide(&Finished, &());
    assert_eq!(decision.action, Action::EndTurn);
    assert_eq!(decision.root_visits, 0);
    assert!(decision.candidates.is_empty());
}

#[test]
fn test_engine_on_terminal_root_stays_at_root() {
    let mut mcts = Mcts::new(
        MctsConfig::with_iterations(20),
        ShapedReward::default(),
        ChaCha8Rng::seed_from_u64(1),
    );
    let result = mcts.run(&Finished, &());
    assert_eq!(result.tree.len(), 1);
    assert_eq!(result.root_visits(), 20);
    assert_eq!(result.stats.rollout_steps, 0);
}

#[test]
fn test_single_legal_action_gets_every_visit() {
    let decision = agent(40, 2).decide(&Broke, &3);
    assert_eq!(decision.action, Action::EndTurn);
    assert_eq!(decision.candidates.len(), 1);
    assert_eq!(decision.candidates[0].action, Action::EndTurn);
    assert_eq!(decision.candidates[0].visits, 40);
}

fn visits_of(decision: &Decision, action: Action) -> u32 {
    decision
        .candidates
        .iter()
        .find(|c| c.action == action)
        .map_or(0, |c| c.visits)
}

#[test]
fn test_prefers_winning_action() {
    for seed in 0..5 {
        let decision = agent(200, seed).decide(&Fork, &ForkState::Start);
        assert_eq!(decision.action, Action::play(0), "seed {}", seed);
        assert!(
            visits_of(&decision, Action::play(0)) > visits_of(&decision, Action::EndTurn),
            "seed {}: {:?}",
            seed,
            decision.candidates
        );

        let play = decision
            .candidates
            .iter()
            .find(|c| c.action == Action::play(0))
            .unwrap();
        assert_eq!(play.mean_reward, 1.0);
    }
}

#[test]
fn test_small_budget_prefers_winning_action_when_cold() {
    // At temperature 0.1 the losing child keeps a few percent of the
    // selection mass at most, so 20 iterations always favour the win.
    let config = MctsConfig::with_iterations(20).with_temperature(0.1);
    for seed in 0..10 {
        let decision = MctsAgent::new(config.clone(), ChaCha8Rng::seed_from_u64(seed))
            .decide(&Fork, &ForkState::Start);
        let play = visits_of(&decision, Action::play(0));
        let end = visits_of(&decision, Action::EndTurn);
        assert_eq!(decision.action, Action::play(0), "seed {}", seed);
        assert!(play > end, "seed {}: play {} vs end {}", seed, play, end);
        assert_eq!(play + end, 20);
    }
}

#[test]
fn test_small_budget_prefers_winning_action_on_most_seeds() {
    // With the default temperature of 1.0 and rewards in [0, 1], softmax
    // selection still sends roughly a quarter of the visits to the losing
    // child. Over only 20 iterations that occasionally ties or flips the
    // visit counts, so the preference holds per seed with high probability
    // rather than always.
    let seeds = 400;
    let wins = (0..seeds)
        .filter(|&seed| {
            let decision = agent(20, seed).decide(&Fork, &ForkState::Start);
            decision.action == Action::play(0)
                && visits_of(&decision, Action::play(0)) > visits_of(&decision, Action::EndTurn)
        })
        .count();
    assert!(
        wins * 10 >= seeds as usize * 9,
        "winning action preferred on only {} of {} seeds",
        wins,
        seeds
    );
}

#[test]
fn test_decision_respects_budget() {
    let combat = Skirmish::default();
    let live = combat.starter(11);
    let decision = agent(37, 11).decide(&combat, &live);
    assert_eq!(decision.root_visits, 37);
    assert_eq!(decision.stats.iterations, 37);
    let child_visits: u32 = decision.candidates.iter().map(|c| c.visits).sum();
    assert!(child_visits <= 37);
}

#[test]
fn test_same_seed_same_decision() {
    let combat = Skirmish::default();
    let live = combat.starter(5);

    let first = agent(80, 99).decide(&combat, &live);
    let second = agent(80, 99).decide(&combat, &live);

    assert_eq!(first.action, second.action);
    assert_eq!(first.candidates, second.candidates);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_search_never_mutates_live_state() {
    let combat = Skirmish::default();
    let live = combat.starter(8);
    let before = live.to_string();
    agent(60, 8).decide(&combat, &live);
    assert_eq!(live.to_string(), before);
}

#[test]
fn test_root_children_are_legal_at_the_root() {
    let combat = Skirmish::default();
    let live = combat.starter(21);
    let mut mcts = Mcts::new(
        MctsConfig::with_iterations(100),
        ShapedReward::default(),
        ChaCha8Rng::seed_from_u64(21),
    );
    let result = mcts.run(&combat, &live);

    let legal = catalog::legal_actions(&combat, &live);
    for (action, _) in result.tree.children(NodeId::ROOT) {
        assert!(legal.contains(action), "{} not legal at the root", action);
    }
}

#[test]
fn test_agent_finishes_a_skirmish() {
    let combat = Skirmish::default();
    let mut state = combat.starter(3);
    let mut agent = agent(30, 3);

    let mut steps = 0;
    while !combat.is_terminal(&state) {
        let action = agent.choose_action(&combat, &state);
        assert!(catalog::is_legal(&combat, &state, action));
        combat.apply(&mut state, action);
        steps += 1;
        assert!(steps < 1_000, "combat did not end");
    }
    assert!(combat.outcome(&state).is_some());
}
