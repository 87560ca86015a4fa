//! Monte Carlo Tree Search for single-player card combat.
//!
//! This crate decides one action at a time for any combat implementing
//! `spire_core::Combat`. Every real decision runs a fresh search: each
//! iteration forks the live snapshot with freshly seeded hidden randomness,
//! descends the tree with stochastic UCB1, expands one untried action,
//! plays uniformly random actions to the end of the combat and feeds a
//! shaped reward back up the path.
//!
//! # Features
//!
//! - **Generic**: Works with any `Combat` implementation
//! - **Stochastic UCB1**: Softmax over UCB1 scores, untried children first
//! - **Shaped rewards**: Wins, losses and unfinished rollouts on one scale
//! - **Deterministic**: A seeded RNG reproduces the whole search
//!
//! # Example
//!
//! ```
//! use spire_mcts::{games::Skirmish, Mcts, MctsConfig, ShapedReward};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let combat = Skirmish::default();
//! let live = combat.starter(42);
//!
//! let config = MctsConfig::with_iterations(50);
//! let evaluator = ShapedReward::new(config.rewards);
//! let mut mcts = Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(42));
//!
//! let result = mcts.run(&combat, &live);
//! assert_eq!(result.root_visits(), 50);
//! println!("Best: {:?}", result.best_child().map(|(action, _)| action));
//! ```

pub mod catalog;
pub mod config;
pub mod driver;
pub mod evaluator;
pub mod games;
pub mod node;
pub mod render;
pub mod search;
pub mod selection;
pub mod tree;

pub use config::{ConfigError, MctsConfig, RewardWeights};
pub use driver::{Agent, Decision, MctsAgent, RandomAgent};
pub use evaluator::{Evaluator, ShapedReward};
pub use node::{Node, NodeId, NodeState};
pub use render::render_tree;
pub use search::{Candidate, Mcts, SearchResult, SearchStats};
pub use tree::Tree;
