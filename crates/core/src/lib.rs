//! Spire Core - Combat contract and shared types
//!
//! This crate defines what the MCTS engine needs from a card-combat
//! simulation, without depending on any particular rules implementation.
//!
//! # Types
//!
//! - [`Combat`] - Trait for combat simulations (the search collaborator)
//! - [`Action`] / [`ActionKey`] - Player choices and search-tree edge labels
//! - [`Outcome`] / [`Vitals`] - Terminal result and health figures
//! - [`Policy`] - Probability distribution used for stochastic selection

mod action;
mod combat;
mod error;
mod types;

pub use action::{Action, ActionKey};
pub use combat::{Combat, Outcome, Vitals};
pub use error::{Result, SpireError};
pub use types::{argmax, Policy};
