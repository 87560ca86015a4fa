use crate::Action;
use serde::{Deserialize, Serialize};

/// Result of a finished combat, from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// Raw health figures of a snapshot.
///
/// Opponent totals are summed over every opponent present at the start of the
/// combat, including the ones already defeated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub player_health: u32,
    pub player_max_health: u32,
    pub opponent_health: u32,
    pub opponent_max_health: u32,
}

impl Vitals {
    /// Remaining player health as a fraction of maximum health, in [0, 1].
    ///
    /// Returns 0.0 when the maximum is zero.
    pub fn health_ratio(&self) -> f64 {
        ratio(self.player_health, self.player_max_health)
    }

    /// Damage dealt to opponents as a fraction of their total maximum health, in [0, 1].
    ///
    /// Returns 0.0 when the opponents' total maximum health is zero.
    pub fn damage_ratio(&self) -> f64 {
        let dealt = self.opponent_max_health.saturating_sub(self.opponent_health);
        ratio(dealt, self.opponent_max_health)
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64 / denominator as f64).clamp(0.0, 1.0)
    }
}

/// A combat simulation the search engine can drive.
///
/// The rules object is shared and immutable; all mutable combat state lives
/// in `Snapshot` values. Every snapshot is independent: mutating one must
/// never be observable through another.
pub trait Combat: Send + Sync {
    /// Full combat state (player, opponents, card piles, hidden randomness).
    type Snapshot: Clone + Send;

    /// Returns an independent copy of `live` whose hidden randomness
    /// (draw order, opponent intents) is reseeded from `seed`.
    ///
    /// Repeated forks with different seeds explore different futures.
    fn fork(&self, live: &Self::Snapshot, seed: u64) -> Self::Snapshot;

    /// Number of cards currently in hand.
    fn hand_size(&self, state: &Self::Snapshot) -> usize;

    /// Returns true if the card in `slot` can be played right now.
    fn is_playable(&self, state: &Self::Snapshot, slot: usize) -> bool;

    /// Applies an action in place, resolving everything it triggers
    /// (card movement, energy, opponent turns) as one step.
    ///
    /// Actions that are not legal in `state` must be ignored, not panic.
    fn apply(&self, state: &mut Self::Snapshot, action: Action);

    /// Returns the outcome if the combat has ended, `None` otherwise.
    fn outcome(&self, state: &Self::Snapshot) -> Option<Outcome>;

    /// Returns true if the combat has ended.
    fn is_terminal(&self, state: &Self::Snapshot) -> bool {
        self.outcome(state).is_some()
    }

    /// Health figures used to score a snapshot.
    fn vitals(&self, state: &Self::Snapshot) -> Vitals;
}
