//! Small hand-built combats shared by the integration tests.

#![allow(dead_code)]

use spire_core::{Action, Combat, Outcome, Vitals};

/// One decision: play the only card and win at full health (reward 1.0),
/// or end the turn and lose without dealing damage (reward 0.0).
pub struct Fork;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForkState {
    Start,
    Won,
    Lost,
}

impl Combat for Fork {
    type Snapshot = ForkState;

    fn fork(&self, live: &ForkState, _seed: u64) -> ForkState {
        *live
    }

    fn hand_size(&self, state: &ForkState) -> usize {
        usize::from(*state == ForkState::Start)
    }

    fn is_playable(&self, state: &ForkState, slot: usize) -> bool {
        *state == ForkState::Start && slot == 0
    }

    fn apply(&self, state: &mut ForkState, action: Action) {
        if *state != ForkState::Start {
            return;
        }
        *state = match action {
            Action::PlayCard { .. } => ForkState::Won,
            Action::EndTurn => ForkState::Lost,
        };
    }

    fn outcome(&self, state: &ForkState) -> Option<Outcome> {
        match state {
            ForkState::Start => None,
            ForkState::Won => Some(Outcome::Win),
            ForkState::Lost => Some(Outcome::Loss),
        }
    }

    fn vitals(&self, state: &ForkState) -> Vitals {
        let (player_health, opponent_health) = match state {
            ForkState::Won => (10, 0),
            ForkState::Start | ForkState::Lost => (0, 10),
        };
        Vitals {
            player_health,
            player_max_health: 10,
            opponent_health,
            opponent_max_health: 10,
        }
    }
}

/// A combat that is already over.
pub struct Finished;

impl Combat for Finished {
    type Snapshot = ();

    fn fork(&self, _live: &(), _seed: u64) {}

    fn hand_size(&self, _state: &()) -> usize {
        0
    }

    fn is_playable(&self, _state: &(), _slot: usize) -> bool {
        false
    }

    fn apply(&self, _state: &mut (), _action: Action) {}

    fn outcome(&self, _state: &()) -> Option<Outcome> {
        Some(Outcome::Win)
    }

    fn vitals(&self, _state: &()) -> Vitals {
        Vitals::default()
    }
}

/// A hand of two cards the player can never afford. The snapshot counts the
/// turns left before the combat is lost.
pub struct Broke;

impl Combat for Broke {
    type Snapshot = u32;

    fn fork(&self, live: &u32, _seed: u64) -> u32 {
        *live
    }

    fn hand_size(&self, _state: &u32) -> usize {
        2
    }

    fn is_playable(&self, _state: &u32, _slot: usize) -> bool {
        false
    }

    fn apply(&self, state: &mut u32, action: Action) {
        if action.is_end_turn() {
            *state = state.saturating_sub(1);
        }
    }

    fn outcome(&self, state: &u32) -> Option<Outcome> {
        (*state == 0).then_some(Outcome::Loss)
    }

    fn vitals(&self, _state: &u32) -> Vitals {
        Vitals {
            player_health: 5,
            player_max_health: 10,
            opponent_health: 10,
            opponent_max_health: 10,
        }
    }
}

/// A snapshot that is nothing but an outcome and vitals, for scoring tests.
pub struct Fixed;

impl Combat for Fixed {
    type Snapshot = (Option<Outcome>, Vitals);

    fn fork(&self, live: &Self::Snapshot, _seed: u64) -> Self::Snapshot {
        *live
    }

    fn hand_size(&self, _state: &Self::Snapshot) -> usize {
        0
    }

    fn is_playable(&self, _state: &Self::Snapshot, _slot: usize) -> bool {
        false
    }

    fn apply(&self, _state: &mut Self::Snapshot, _action: Action) {}

    fn outcome(&self, state: &Self::Snapshot) -> Option<Outcome> {
        state.0
    }

    fn vitals(&self, state: &Self::Snapshot) -> Vitals {
        state.1
    }
}
