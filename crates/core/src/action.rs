//! Player actions and the keys that label search-tree edges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A choice available to the player at a decision point.
///
/// `PlayCard` refers to a hand slot, which is only meaningful against the
/// snapshot the action was enumerated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play the card currently held in hand slot `slot`.
    PlayCard { slot: usize },

    /// End the player's turn.
    EndTurn,
}

impl Action {
    /// Shorthand for `Action::PlayCard { slot }`.
    pub fn play(slot: usize) -> Self {
        Action::PlayCard { slot }
    }

    /// Key identifying this choice among the siblings of one node.
    pub fn key(self) -> ActionKey {
        match self {
            Action::PlayCard { slot } => ActionKey(slot),
            Action::EndTurn => ActionKey::END_TURN,
        }
    }

    pub fn is_end_turn(self) -> bool {
        matches!(self, Action::EndTurn)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::PlayCard { slot } => write!(f, "play[{}]", slot),
            Action::EndTurn => write!(f, "end turn"),
        }
    }
}

/// Edge label for the search tree.
///
/// Two actions enumerated from different snapshots compare equal when they
/// make the same choice at the same node, even if the card behind the slot
/// differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionKey(usize);

impl ActionKey {
    /// Reserved key for `Action::EndTurn`.
    pub const END_TURN: ActionKey = ActionKey(usize::MAX);
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::END_TURN {
            write!(f, "end")
        } else {
            write!(f, "play#{}", self.0)
        }
    }
}
