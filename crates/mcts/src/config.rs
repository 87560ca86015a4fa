//! MCTS configuration parameters.
//!
//! These parameters are fixed when an agent is built and never change during
//! a search. Defaults reproduce the stochastic UCB-1 bot the engine was tuned
//! against.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse MCTS config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Weights that shape the reward of a rollout's final snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    /// Reward for any win, before the health bonus.
    pub win_base: f64,

    /// Added to a win, scaled by the player's remaining health ratio.
    pub win_health_bonus: f64,

    /// Scales the damage ratio on a loss.
    pub loss_damage: f64,

    /// Scales the damage ratio when a rollout stops before the combat ends.
    pub ongoing_damage: f64,

    /// Scales the health ratio when a rollout stops before the combat ends.
    pub ongoing_health: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            win_base: 0.8,
            win_health_bonus: 0.2,
            loss_damage: 0.3,
            ongoing_damage: 0.7,
            ongoing_health: 0.3,
        }
    }
}

impl RewardWeights {
    /// True if the weakest possible win outscores the strongest possible loss.
    pub fn win_dominates_loss(&self) -> bool {
        self.win_base > self.loss_damage
    }

    /// True if the weakest possible win outscores any unfinished rollout.
    ///
    /// The default weights do not satisfy this: an unfinished rollout with
    /// every opponent nearly dead and the player at full health can score
    /// up to 1.0.
    pub fn win_dominates_ongoing(&self) -> bool {
        self.win_base > self.ongoing_damage + self.ongoing_health
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("rewards.win_base", self.win_base),
            ("rewards.win_health_bonus", self.win_health_bonus),
            ("rewards.loss_damage", self.loss_damage),
            ("rewards.ongoing_damage", self.ongoing_damage),
            ("rewards.ongoing_health", self.ongoing_health),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} must be finite and non-negative", value),
                });
            }
        }
        Ok(())
    }
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Number of complete iterations (simulations) per decision.
    pub iterations: usize,

    /// UCB-1 exploration coefficient.
    pub exploration: f64,

    /// Softmax temperature applied to UCB-1 scores during selection.
    /// Lower values approach deterministic argmax.
    pub temperature: f64,

    /// Maximum number of random actions in one rollout. A rollout that hits
    /// the limit is scored as an unfinished combat.
    pub max_rollout_depth: usize,

    /// Reward shaping weights.
    pub rewards: RewardWeights,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            exploration: 0.5,
            temperature: 1.0,
            max_rollout_depth: 1000,
            rewards: RewardWeights::default(),
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified iteration budget.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Builder pattern: set the exploration coefficient.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder pattern: set the selection temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builder pattern: set the rollout depth limit.
    pub fn with_max_rollout_depth(mut self, depth: usize) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Builder pattern: set the reward weights.
    pub fn with_rewards(mut self, rewards: RewardWeights) -> Self {
        self.rewards = rewards;
        self
    }

    /// Parse a TOML document and validate it. Missing keys take their defaults.
    ///
    /// ```
    /// use spire_mcts::MctsConfig;
    ///
    /// let config = MctsConfig::from_toml_str("iterations = 250\n[rewards]\nwin_base = 2.0\n").unwrap();
    /// assert_eq!(config.iterations, 250);
    /// assert_eq!(config.rewards.win_base, 2.0);
    /// assert_eq!(config.temperature, 1.0);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is usable by the search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(ConfigError::Invalid {
                field: "exploration",
                reason: format!("{} must be finite and non-negative", self.exploration),
            });
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "temperature",
                reason: format!("{} must be finite and positive", self.temperature),
            });
        }
        self.rewards.validate()
    }
}
