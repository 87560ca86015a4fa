//! Stochastic UCB-1 child selection.
//!
//! Children that were never visited are tried first, uniformly at random.
//! Once every child has a visit, UCB-1 scores are turned into a softmax
//! distribution and the next child is sampled from it instead of taking the
//! argmax.

use crate::node::{Node, NodeId};
use crate::tree::Tree;
use rand::Rng;
use spire_core::{argmax, Action, Policy};

/// UCB-1 score of a visited child.
///
/// `mean + exploration * sqrt(ln(parent_visits) / child_visits)`.
/// Must only be called with `child.visit_count > 0`.
pub fn ucb1(child: &Node, parent_visits: u32, exploration: f64) -> f64 {
    debug_assert!(child.visit_count > 0, "UCB-1 on an unvisited child");
    let visits = child.visit_count as f64;
    let exploitation = child.total_reward / visits;
    let parent = (parent_visits.max(1)) as f64;
    exploitation + exploration * (parent.ln() / visits).sqrt()
}

/// Pick the next child of `parent` to descend into.
///
/// Returns `None` if `parent` has no children.
pub fn select_child<R: Rng + ?Sized>(
    tree: &Tree,
    parent: NodeId,
    exploration: f64,
    temperature: f64,
    rng: &mut R,
) -> Option<(Action, NodeId)> {
    let children = tree.children(parent);
    if children.is_empty() {
        return None;
    }

    let unvisited: Vec<(Action, NodeId)> = children
        .iter()
        .copied()
        .filter(|(_, id)| tree.get(*id).visit_count == 0)
        .collect();
    if !unvisited.is_empty() {
        return Some(unvisited[rng.gen_range(0..unvisited.len())]);
    }

    // Every child has at least one visit from here on.
    let parent_visits = tree.get(parent).visit_count;
    let scores: Vec<f64> = children
        .iter()
        .map(|(_, id)| ucb1(tree.get(*id), parent_visits, exploration))
        .collect();

    let index = match Policy::softmax(&scores, temperature) {
        Ok(policy) => policy.sample(rng),
        // Temperature is validated with the config; a non-finite score can
        // only come from a non-finite reward. Fall back to the best score.
        Err(_) => argmax(&scores),
    };
    Some(children[index])
}
