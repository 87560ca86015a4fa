//! Combat implementations for exercising the engine.
//!
//! The real game rules live outside this crate; these are small,
//! seedable stand-ins used by the tests, the docs and the arena.

pub mod skirmish;

pub use skirmish::{
    Card, Intent, Opponent, OpponentKind, Scenario, Skirmish, SkirmishState, UnknownScenario,
};
