//! Legal action enumeration.
//!
//! One `PlayCard` per affordable hand slot, in slot order, followed by
//! exactly one `EndTurn`. Ending the turn is always legal, so the search
//! never faces an empty choice.

use spire_core::{Action, ActionKey, Combat};

/// All actions legal in `state` right now.
pub fn legal_actions<C: Combat>(combat: &C, state: &C::Snapshot) -> Vec<Action> {
    let mut actions: Vec<Action> = (0..combat.hand_size(state))
        .filter(|&slot| combat.is_playable(state, slot))
        .map(Action::play)
        .collect();
    actions.push(Action::EndTurn);
    actions
}

/// Returns true if `action` may be applied to `state`.
pub fn is_legal<C: Combat>(combat: &C, state: &C::Snapshot, action: Action) -> bool {
    match action {
        Action::EndTurn => true,
        Action::PlayCard { slot } => {
            slot < combat.hand_size(state) && combat.is_playable(state, slot)
        }
    }
}

/// The legal action in `state` whose key is `key`, if any.
pub fn find_by_key<C: Combat>(combat: &C, state: &C::Snapshot, key: ActionKey) -> Option<Action> {
    legal_actions(combat, state)
        .into_iter()
        .find(|action| action.key() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spire_core::{Outcome, Vitals};

    /// Hand of card costs against a fixed energy pool.
    struct Costs;

    impl Combat for Costs {
        type Snapshot = (Vec<u32>, u32);

        fn fork(&self, live: &Self::Snapshot, _seed: u64) -> Self::Snapshot {
            live.clone()
        }
        fn hand_size(&self, state: &Self::Snapshot) -> usize {
            state.0.len()
        }
        fn is_playable(&self, state: &Self::Snapshot, slot: usize) -> bool {
            state.0[slot] <= state.1
        }
        fn apply(&self, _state: &mut Self::Snapshot, _action: Action) {}
        fn outcome(&self, _state: &Self::Snapshot) -> Option<Outcome> {
            None
        }
        fn vitals(&self, _state: &Self::Snapshot) -> Vitals {
            Vitals::default()
        }
    }

    #[test]
    fn test_affordable_cards_then_end_turn() {
        let state = (vec![1, 2, 1, 3], 1);
        assert_eq!(
            legal_actions(&Costs, &state),
            vec![Action::play(0), Action::play(2), Action::EndTurn]
        );
    }

    #[test]
    fn test_end_turn_always_present() {
        let empty_hand = (vec![], 3);
        assert_eq!(legal_actions(&Costs, &empty_hand), vec![Action::EndTurn]);

        let broke = (vec![1, 1], 0);
        assert_eq!(legal_actions(&Costs, &broke), vec![Action::EndTurn]);
    }

    #[test]
    fn test_is_legal() {
        let state = (vec![1, 2], 1);
        assert!(is_legal(&Costs, &state, Action::play(0)));
        assert!(!is_legal(&Costs, &state, Action::play(1)));
        assert!(!is_legal(&Costs, &state, Action::play(5)));
        assert!(is_legal(&Costs, &state, Action::EndTurn));
    }

    #[test]
    fn test_find_by_key() {
        let state = (vec![1, 2, 1], 1);
        assert_eq!(find_by_key(&Costs, &state, Action::play(2).key()), Some(Action::play(2)));
        assert_eq!(find_by_key(&Costs, &state, Action::play(1).key()), None);
        assert_eq!(find_by_key(&Costs, &state, ActionKey::END_TURN), Some(Action::EndTurn));
    }
}
