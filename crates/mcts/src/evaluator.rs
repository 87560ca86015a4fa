//! Evaluation abstraction for MCTS.
//!
//! An `Evaluator` scores the snapshot a rollout ends on. It must be a pure
//! function of the snapshot so that independent searches can share one
//! evaluator across threads.

use crate::config::RewardWeights;
use spire_core::{Combat, Outcome};

/// Trait for scoring combat snapshots.
pub trait Evaluator<C: Combat> {
    /// Score a snapshot, terminal or not. Higher is better for the player.
    fn evaluate(&self, combat: &C, state: &C::Snapshot) -> f64;
}

/// Reward shaping from the player's health and the damage dealt.
///
/// - win: `win_base + win_health_bonus * health_ratio`
/// - loss: `loss_damage * damage_ratio`
/// - unfinished: `ongoing_damage * damage_ratio + ongoing_health * health_ratio`
///
/// With the default weights wins score in [0.8, 1.0], losses in [0.0, 0.3]
/// and unfinished rollouts in [0.0, 1.0].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShapedReward {
    weights: RewardWeights,
}

impl ShapedReward {
    pub fn new(weights: RewardWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RewardWeights {
        &self.weights
    }
}

impl<C: Combat> Evaluator<C> for ShapedReward {
    fn evaluate(&self, combat: &C, state: &C::Snapshot) -> f64 {
        let vitals = combat.vitals(state);
        let w = &self.weights;
        match combat.outcome(state) {
            Some(Outcome::Win) => w.win_base + w.win_health_bonus * vitals.health_ratio(),
            Some(Outcome::Loss) => w.loss_damage * vitals.damage_ratio(),
            None => {
                w.ongoing_damage * vitals.damage_ratio() + w.ongoing_health * vitals.health_ratio()
            }
        }
    }
}
