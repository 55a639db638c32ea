//! Environment traits and episode records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::State;

/// Result of a single environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    /// State after the action
    pub next_state: S,
    /// Reward signal
    pub reward: f64,
    /// Whether the episode is done
    pub done: bool,
}

/// One observed `(state, action, next_state, reward)` sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S, A> {
    /// State the action was taken in
    pub state: S,
    /// Action taken
    pub action: A,
    /// State reached
    pub next_state: S,
    /// Reward received
    pub reward: f64,
}

impl<S, A> Transition<S, A> {
    /// Create a new transition
    pub fn new(state: S, action: A, next_state: S, reward: f64) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
        }
    }
}

/// Episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode ID
    pub id: String,
    /// Total (undiscounted) reward
    pub total_reward: f64,
    /// Number of steps
    pub steps: usize,
    /// Whether the episode hit the step limit before finishing
    pub truncated: bool,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// End time
    pub end_time: Option<DateTime<Utc>>,
}

impl Episode {
    /// Open a new episode record
    #[must_use]
    pub fn begin() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            total_reward: 0.0,
            steps: 0,
            truncated: false,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    /// Account for one step
    pub fn record(&mut self, reward: f64) {
        self.total_reward += reward;
        self.steps += 1;
    }

    /// Close the record
    pub fn finish(&mut self, truncated: bool) {
        self.truncated = truncated;
        self.end_time = Some(Utc::now());
    }
}

/// A sampled, stateful world a learner acts in.
///
/// Unlike [`crate::MarkovDecisionProcess`], it exposes no model: learners only
/// see the transitions it produces.
pub trait Environment {
    /// State type
    type State: State;
    /// Action type
    type Action: Clone;

    /// Reset to the start of an episode
    fn reset(&mut self) -> Self::State;

    /// Current state
    fn current_state(&self) -> &Self::State;

    /// Legal actions in `state`
    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Take `action` in the current state
    fn step(&mut self, action: &Self::Action) -> crate::Result<Step<Self::State>>;

    /// Whether the current state is terminal
    fn is_terminal(&self) -> bool {
        self.possible_actions(self.current_state()).is_empty()
    }
}
