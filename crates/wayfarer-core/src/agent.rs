//! Agent traits, configuration and metrics

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Transition, WayfarerError};

fn check_unit_interval(name: &str, value: f64) -> crate::Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WayfarerError::InvalidParameter(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}

/// Configuration for Q-learning agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Learning rate
    pub alpha: f64,
    /// Exploration probability
    pub epsilon: f64,
    /// Discount factor
    pub discount: f64,
    /// Episodes spent training before exploration and learning switch off
    pub num_training: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            epsilon: 0.05,
            discount: 0.8,
            num_training: 100,
        }
    }
}

impl LearningConfig {
    /// Defaults for agents driven by an external game loop
    #[must_use]
    pub fn pacman() -> Self {
        Self {
            alpha: 0.2,
            epsilon: 0.05,
            discount: 0.8,
            num_training: 0,
        }
    }

    /// Check every rate lies in `[0, 1]`
    pub fn validate(&self) -> crate::Result<()> {
        check_unit_interval("alpha", self.alpha)?;
        check_unit_interval("epsilon", self.epsilon)?;
        check_unit_interval("discount", self.discount)
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration for value iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    /// Discount factor
    pub discount: f64,
    /// Number of synchronous sweeps; the only stopping criterion
    pub iterations: usize,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            discount: 0.9,
            iterations: 100,
        }
    }
}

impl ValueIterationConfig {
    /// Check the discount lies in `[0, 1]`
    pub fn validate(&self) -> crate::Result<()> {
        check_unit_interval("discount", self.discount)
    }
}

/// Configuration for depth-limited adversarial search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSearchConfig {
    /// Search depth in full rounds of every agent moving once
    pub depth: usize,
}

impl Default for TreeSearchConfig {
    fn default() -> Self {
        Self { depth: 2 }
    }
}

/// Running episode statistics of a learning agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    /// Completed episodes
    pub episodes_so_far: usize,
    /// Transitions observed
    pub total_steps: usize,
    /// Reward collected in the current episode
    pub episode_rewards: f64,
    /// Reward summed over training episodes
    pub accum_train_rewards: f64,
    /// Reward summed over episodes after training
    pub accum_test_rewards: f64,
}

impl AgentMetrics {
    /// Reset the per-episode reward
    pub fn begin_episode(&mut self) {
        self.episode_rewards = 0.0;
    }

    /// Account for one observed transition
    pub fn record(&mut self, reward: f64) {
        self.episode_rewards += reward;
        self.total_steps += 1;
    }

    /// Close the current episode.
    ///
    /// Returns `true` once training is over, i.e. `num_training` episodes
    /// have completed.
    pub fn end_episode(&mut self, num_training: usize) -> bool {
        if self.episodes_so_far < num_training {
            self.accum_train_rewards += self.episode_rewards;
        } else {
            self.accum_test_rewards += self.episode_rewards;
        }
        self.episodes_so_far += 1;
        self.episodes_so_far >= num_training
    }

    /// Whether training episodes remain
    #[must_use]
    pub fn is_in_training(&self, num_training: usize) -> bool {
        self.episodes_so_far < num_training
    }
}

/// Agents that estimate values and derive a greedy policy from them
pub trait ValueEstimator {
    /// State type
    type State;
    /// Action type
    type Action;

    /// Value of `state`
    fn get_value(&self, state: &Self::State) -> f64;

    /// Value of taking `action` in `state`
    fn get_q_value(&self, state: &Self::State, action: &Self::Action) -> f64;

    /// Best action in `state`; `None` when no action is legal
    fn get_policy(&self, state: &Self::State) -> Option<Self::Action>;
}

/// Agents that learn online from observed transitions.
///
/// The learning update fires only from [`ReinforcementLearner::observe_transition`];
/// implementations keep it private.
pub trait ReinforcementLearner {
    /// State type
    type State;
    /// Action type
    type Action;

    /// Choose an action in `state`; `None` when no action is legal
    fn get_action(&mut self, state: &Self::State) -> Option<Self::Action>;

    /// Notification that `transition` happened
    fn observe_transition(&mut self, transition: Transition<Self::State, Self::Action>);

    /// Called before an episode's first action
    fn start_episode(&mut self);

    /// Called after an episode's last transition
    fn stop_episode(&mut self);

    /// Episode statistics so far
    fn metrics(&self) -> &AgentMetrics;
}

/// Agents whose learned tables can be written to and read from disk
#[async_trait]
pub trait Persist: Send + Sync {
    /// Save the learned parameters
    async fn save(&self, path: &std::path::Path) -> crate::Result<()>;

    /// Load previously saved parameters
    async fn load(&mut self, path: &std::path::Path) -> crate::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_config_defaults_and_validation() {
        let config = LearningConfig::default();
        assert!(config.validate().is_ok());

        let bad = LearningConfig {
            alpha: 1.5,
            ..LearningConfig::default()
        };
        assert!(matches!(bad.validate(), Err(WayfarerError::InvalidParameter(_))));
    }

    #[test]
    fn test_learning_config_from_partial_json() {
        let config = LearningConfig::from_json(r#"{"alpha": 0.5, "num_training": 10}"#).unwrap();
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.num_training, 10);
        assert_eq!(config.epsilon, 0.05);

        assert!(LearningConfig::from_json(r#"{"epsilon": -0.1}"#).is_err());
    }

    #[test]
    fn test_game_loop_defaults() {
        let config = LearningConfig::pacman();
        assert!(config.validate().is_ok());
        assert_eq!(config.alpha, 0.2);
        assert_eq!(config.num_training, 0);
    }

    #[test]
    fn test_tree_depth_from_json() {
        let config: TreeSearchConfig = serde_json::from_str(r#"{"depth": 0}"#).unwrap();
        assert_eq!(config.depth, 0);
        let config: TreeSearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TreeSearchConfig::default());
    }

    #[test]
    fn test_metrics_split_training_and_testing() {
        let mut metrics = AgentMetrics::default();

        metrics.begin_episode();
        metrics.record(2.0);
        assert!(!metrics.end_episode(2));

        metrics.begin_episode();
        metrics.record(3.0);
        assert!(metrics.end_episode(2));

        metrics.begin_episode();
        metrics.record(5.0);
        assert!(metrics.end_episode(2));

        assert_eq!(metrics.episodes_so_far, 3);
        assert_eq!(metrics.total_steps, 3);
        assert_eq!(metrics.accum_train_rewards, 5.0);
        assert_eq!(metrics.accum_test_rewards, 5.0);
    }
}
