//! Monte Carlo Tree Search implementation.
//!
//! Each iteration works on its own fork of the live combat and runs four
//! phases against that one snapshot, mutating it in place:
//! 1. Selection: descend through fully expanded nodes with stochastic UCB-1
//! 2. Expansion: turn one pending action into a new child
//! 3. Rollout: play uniformly random actions until the combat ends
//! 4. Backpropagation: add the rollout's reward from the new node to the root

use crate::{
    catalog,
    config::MctsConfig,
    evaluator::Evaluator,
    node::NodeId,
    selection::select_child,
    tree::Tree,
};
use rand::Rng;
use spire_core::{Action, Combat};
use std::marker::PhantomData;
use tracing::{debug, trace, warn};

/// Counters collected while searching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Completed iterations.
    pub iterations: usize,

    /// Rollouts evaluated (one per iteration).
    pub rollouts: usize,

    /// Iterations that created a new node.
    pub expansions: usize,

    /// Random actions applied across all rollouts.
    pub rollout_steps: usize,

    /// Deepest node a rollout started from.
    pub max_depth: usize,
}

/// Per-action statistics of a root child.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Action stored on the edge, as enumerated in the first snapshot that expanded it.
    pub action: Action,
    pub visits: u32,
    pub mean_reward: f64,
}

/// Result of an MCTS search: the finished tree and its counters.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub tree: Tree,
    pub stats: SearchStats,
}

impl SearchResult {
    /// Visits recorded at the root. Equals the number of completed iterations.
    pub fn root_visits(&self) -> u32 {
        self.tree.root().visit_count
    }

    /// Visit count for each root child, in expansion order.
    pub fn visit_counts(&self) -> Vec<(Action, u32)> {
        self.tree
            .children(NodeId::ROOT)
            .iter()
            .map(|(action, id)| (*action, self.tree.get(*id).visit_count))
            .collect()
    }

    /// Statistics for each root child, in expansion order.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.tree
            .children(NodeId::ROOT)
            .iter()
            .map(|(action, id)| {
                let node = self.tree.get(*id);
                Candidate {
                    action: *action,
                    visits: node.visit_count,
                    mean_reward: node.mean_reward().unwrap_or(0.0),
                }
            })
            .collect()
    }

    /// Most visited root child.
    pub fn best_child(&self) -> Option<(Action, NodeId)> {
        self.tree.most_visited_child(NodeId::ROOT)
    }
}

/// Monte Carlo Tree Search with stochastic UCB-1 selection.
///
/// Generic over:
/// - `C`: The combat being searched
/// - `E`: The evaluation applied at the end of each rollout
/// - `R`: The random number generator driving selection, expansion,
///   rollouts and snapshot forks
pub struct Mcts<C: Combat, E: Evaluator<C>, R: Rng> {
    config: MctsConfig,
    evaluator: E,
    rng: R,
    _combat: PhantomData<fn(&C)>,
}

impl<C, E, R> Mcts<C, E, R>
where
    C: Combat,
    E: Evaluator<C>,
    R: Rng,
{
    /// Create a new MCTS instance.
    pub fn new(config: MctsConfig, evaluator: E, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
            _combat: PhantomData,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Search from `live` for the configured number of iterations.
    ///
    /// `live` is never mutated; every iteration runs on a fresh fork.
    pub fn run(&mut self, combat: &C, live: &C::Snapshot) -> SearchResult {
        self.run_until(combat, live, |_| false)
    }

    /// Like [`Mcts::run`], but stops early once `stop` returns true.
    ///
    /// `stop` is consulted only between complete iterations, so the tree is
    /// always left consistent.
    pub fn run_until<F>(&mut self, combat: &C, live: &C::Snapshot, mut stop: F) -> SearchResult
    where
        F: FnMut(&SearchStats) -> bool,
    {
        let mut tree = Tree::new();
        let mut stats = SearchStats::default();

        for _ in 0..self.config.iterations {
            let seed = self.rng.gen::<u64>();
            let mut snapshot = combat.fork(live, seed);
            self.iterate(combat, &mut tree, &mut snapshot, &mut stats);

            if stop(&stats) {
                debug!(iterations = stats.iterations, "search stopped early");
                break;
            }
        }

        debug!(
            iterations = stats.iterations,
            nodes = tree.len(),
            expansions = stats.expansions,
            max_depth = stats.max_depth,
            rollout_steps = stats.rollout_steps,
            "search complete"
        );

        SearchResult { tree, stats }
    }

    /// One full iteration: select, expand, rollout, backpropagate.
    fn iterate(
        &mut self,
        combat: &C,
        tree: &mut Tree,
        state: &mut C::Snapshot,
        stats: &mut SearchStats,
    ) {
        let leaf = self.select(combat, tree, state);

        let node = if combat.is_terminal(state) {
            leaf
        } else {
            self.expand(combat, tree, leaf, state)
        };
        if node != leaf {
            stats.expansions += 1;
        }

        let reward = self.rollout(combat, state, stats);
        tree.backpropagate(node, reward);

        stats.iterations += 1;
        stats.max_depth = stats.max_depth.max(tree.depth(node));

        trace!(
            iteration = stats.iterations,
            node = node.index(),
            reward = reward,
            "MCTS iteration complete"
        );
    }

    /// Descend from the root while the current node is fully expanded,
    /// applying each chosen edge to `state`.
    ///
    /// Stops at the first node that still has pending actions (or has never
    /// computed them), or as soon as `state` is terminal.
    fn select(&mut self, combat: &C, tree: &Tree, state: &mut C::Snapshot) -> NodeId {
        let mut current = NodeId::ROOT;

        while !combat.is_terminal(state) {
            if !tree.get(current).is_fully_expanded() {
                return current;
            }

            let (action, child) = match select_child(
                tree,
                current,
                self.config.exploration,
                self.config.temperature,
                &mut self.rng,
            ) {
                Some(edge) => edge,
                None => return current,
            };

            // Hand slots below a turn boundary depend on the fork's draw; an
            // edge made for another draw may not exist in this one.
            if !catalog::is_legal(combat, state, action) {
                trace!(node = current.index(), %action, "edge not legal in this fork");
                return current;
            }

            combat.apply(state, action);
            current = child;
        }

        current
    }

    /// Turn one pending action of `id` into a child and apply it.
    ///
    /// Returns `id` unchanged if no pending action is legal in `state`.
    fn expand(
        &mut self,
        combat: &C,
        tree: &mut Tree,
        id: NodeId,
        state: &mut C::Snapshot,
    ) -> NodeId {
        if tree.get(id).pending.is_none() {
            let actions = catalog::legal_actions(combat, state);
            tree.get_mut(id).pending = Some(actions);
        }

        let candidates: Vec<usize> = match &tree.get(id).pending {
            Some(pending) => pending
                .iter()
                .enumerate()
                .filter(|(_, action)| catalog::is_legal(combat, state, **action))
                .map(|(i, _)| i)
                .collect(),
            None => Vec::new(),
        };
        if candidates.is_empty() {
            return id;
        }

        let pick = candidates[self.rng.gen_range(0..candidates.len())];
        let action = match tree.get_mut(id).pending.as_mut() {
            Some(pending) => pending.remove(pick),
            None => return id,
        };

        let child = tree.add_child(id, action);
        combat.apply(state, action);
        child
    }

    /// Play uniformly random legal actions until the combat ends, no action
    /// is available, or the depth limit is hit; then score the result.
    fn rollout(&mut self, combat: &C, state: &mut C::Snapshot, stats: &mut SearchStats) -> f64 {
        let mut steps = 0;

        while !combat.is_terminal(state) && steps < self.config.max_rollout_depth {
            let actions = catalog::legal_actions(combat, state);
            if actions.is_empty() {
                warn!("combat reported no legal actions; ending rollout");
                break;
            }

            let action = actions[self.rng.gen_range(0..actions.len())];
            combat.apply(state, action);
            steps += 1;
        }

        stats.rollouts += 1;
        stats.rollout_steps += steps;
        self.evaluator.evaluate(combat, state)
    }
}
