//! Markov decision processes

use std::fmt::Debug;
use std::hash::Hash;

use crate::State;

/// A finite Markov decision process with a known model.
///
/// The value-iteration and Q-learning cores treat it as read-only.
pub trait MarkovDecisionProcess {
    /// State type
    type State: State;
    /// Action type
    type Action: Clone + Eq + Hash + Debug;

    /// Every state of the process
    fn states(&self) -> Vec<Self::State>;

    /// Where episodes begin
    fn start_state(&self) -> Self::State;

    /// Legal actions in `state`; empty for terminal states
    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// `(next_state, probability)` pairs for taking `action` in `state`.
    ///
    /// Probabilities over the returned states sum to 1.
    fn transition_states_and_probs(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<(Self::State, f64)>;

    /// Reward for the transition `state --action--> next_state`
    fn reward(&self, state: &Self::State, action: &Self::Action, next_state: &Self::State) -> f64;

    /// Whether `state` ends an episode
    fn is_terminal(&self, state: &Self::State) -> bool;
}

impl<M: MarkovDecisionProcess + ?Sized> MarkovDecisionProcess for &M {
    type State = M::State;
    type Action = M::Action;

    fn states(&self) -> Vec<Self::State> {
        (**self).states()
    }

    fn start_state(&self) -> Self::State {
        (**self).start_state()
    }

    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        (**self).possible_actions(state)
    }

    fn transition_states_and_probs(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<(Self::State, f64)> {
        (**self).transition_states_and_probs(state, action)
    }

    fn reward(&self, state: &Self::State, action: &Self::Action, next_state: &Self::State) -> f64 {
        (**self).reward(state, action, next_state)
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        (**self).is_terminal(state)
    }
}
