//! Decision driver: one fresh search per real decision point.
//!
//! The agent keeps nothing between decisions except its configuration and
//! random source. Each call builds a new tree, reduces it to one action and
//! drops it.

use crate::{
    catalog,
    config::MctsConfig,
    evaluator::ShapedReward,
    render::render_tree,
    search::{Candidate, Mcts, SearchStats},
};
use rand::seq::SliceRandom;
use rand::Rng;
use spire_core::{Action, Combat};
use tracing::{debug, enabled, trace, warn, Level};

/// Depth of the tree dump emitted at TRACE level.
const TRACE_TREE_DEPTH: usize = 2;

/// Outcome of one decision.
#[derive(Clone, Debug)]
pub struct Decision {
    /// Action to play, valid against the live snapshot.
    pub action: Action,

    /// Root visits (the number of completed iterations).
    pub root_visits: u32,

    /// Root children statistics, in expansion order.
    pub candidates: Vec<Candidate>,

    pub stats: SearchStats,
}

impl Decision {
    fn end_turn() -> Self {
        Self {
            action: Action::EndTurn,
            root_visits: 0,
            candidates: Vec::new(),
            stats: SearchStats::default(),
        }
    }
}

/// Something that picks the next action for a live combat.
pub trait Agent {
    /// Choose an action that is legal in `live`.
    fn choose_action<C: Combat>(&mut self, combat: &C, live: &C::Snapshot) -> Action;
}

/// Combat agent choosing moves with stochastic UCB-1 MCTS.
///
/// # Example
///
/// ```
/// use spire_mcts::{games::Skirmish, Agent, MctsAgent, MctsConfig};
/// use spire_core::Combat;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let combat = Skirmish::default();
/// let state = combat.starter(7);
///
/// let mut agent = MctsAgent::new(MctsConfig::with_iterations(50), ChaCha8Rng::seed_from_u64(7));
/// let action = agent.choose_action(&combat, &state);
/// assert!(spire_mcts::catalog::is_legal(&combat, &state, action));
/// ```
pub struct MctsAgent<R: Rng> {
    config: MctsConfig,
    rng: R,
}

impl<R: Rng> MctsAgent<R> {
    pub fn new(config: MctsConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Search from `live` and return the most visited root action with the
    /// statistics behind it.
    ///
    /// Falls back to ending the turn if `live` is already over or the search
    /// produced no root children.
    pub fn decide<C: Combat>(&mut self, combat: &C, live: &C::Snapshot) -> Decision {
        if combat.is_terminal(live) {
            debug!("combat already over; ending turn without searching");
            return Decision::end_turn();
        }

        let evaluator = ShapedReward::new(self.config.rewards);
        let mut engine = Mcts::new(self.config.clone(), evaluator, &mut self.rng);
        let result = engine.run(combat, live);

        if enabled!(Level::TRACE) {
            trace!("search tree:\n{}", render_tree(&result.tree, Some(TRACE_TREE_DEPTH)));
        }

        // Edge actions may carry slots from another fork's snapshot; resolve
        // the winning key against the live snapshot instead.
        let action = match result.best_child() {
            Some((edge, _)) => match catalog::find_by_key(combat, live, edge.key()) {
                Some(action) => action,
                None => {
                    warn!(
                        key = %edge.key(),
                        "best edge is not legal in the live state; ending turn"
                    );
                    Action::EndTurn
                }
            },
            None => Action::EndTurn,
        };

        debug!(
            %action,
            root_visits = result.root_visits(),
            nodes = result.tree.len(),
            "decision made"
        );

        Decision {
            action,
            root_visits: result.root_visits(),
            candidates: result.candidates(),
            stats: result.stats,
        }
    }

    /// Pick a target index uniformly at random (opponent or card prompts).
    ///
    /// Returns `None` if there is nothing to choose from.
    pub fn choose_target<T>(&mut self, candidates: &[T]) -> Option<usize> {
        if candidates.is_empty() {
            None
        } else {
            Some(self.rng.gen_range(0..candidates.len()))
        }
    }
}

impl<R: Rng> Agent for MctsAgent<R> {
    fn choose_action<C: Combat>(&mut self, combat: &C, live: &C::Snapshot) -> Action {
        self.decide(combat, live).action
    }
}

/// Baseline agent playing a uniformly random legal action.
pub struct RandomAgent<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomAgent<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn choose_action<C: Combat>(&mut self, combat: &C, live: &C::Snapshot) -> Action {
        if combat.is_terminal(live) {
            return Action::EndTurn;
        }
        catalog::legal_actions(combat, live)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::EndTurn)
    }
}
