//! Offline planning over a known MDP by batch value iteration

use tracing::{debug, warn};
use wayfarer_core::{
    MarkovDecisionProcess, Result, ValueEstimator, ValueIterationConfig, ValueTable,
};

use crate::utils::{best_action, max_value};

/// Value-iteration planner.
///
/// All sweeps run at construction. Every sweep computes the new values
/// from a snapshot of the previous sweep, never from values written
/// earlier in the same sweep.
pub struct ValueIterationAgent<M: MarkovDecisionProcess> {
    mdp: M,
    discount: f64,
    iterations: usize,
    values: ValueTable<M::State>,
    last_residual: f64,
}

impl<M: MarkovDecisionProcess> ValueIterationAgent<M> {
    /// Plan over `mdp` for `config.iterations` sweeps
    ///
    /// # Errors
    ///
    /// Rejects a discount outside `[0, 1]`.
    pub fn new(mdp: M, config: &ValueIterationConfig) -> Result<Self> {
        config.validate()?;
        let mut agent = Self {
            mdp,
            discount: config.discount,
            iterations: config.iterations,
            values: ValueTable::new(),
            last_residual: 0.0,
        };
        agent.run_value_iteration();
        Ok(agent)
    }

    fn run_value_iteration(&mut self) {
        let states = self.mdp.states();
        let stuck = states
            .iter()
            .filter(|state| {
                !self.mdp.is_terminal(state) && self.mdp.possible_actions(state).is_empty()
            })
            .count();
        if stuck > 0 {
            warn!(stuck, "non-terminal states without actions keep value 0");
        }

        for _ in 0..self.iterations {
            let snapshot = self.values.clone();
            let mut next = ValueTable::new();
            let mut residual: f64 = 0.0;
            for state in &states {
                if self.mdp.is_terminal(state) {
                    continue;
                }
                let actions = self.mdp.possible_actions(state);
                if actions.is_empty() {
                    continue;
                }
                let value = max_value(
                    actions,
                    |action| self.q_value_from(&snapshot, state, action),
                    0.0,
                );
                residual = residual.max((value - snapshot.get(state)).abs());
                next.set(state.clone(), value);
            }
            self.values = next;
            self.last_residual = residual;
        }

        debug!(
            states = states.len(),
            iterations = self.iterations,
            residual = self.last_residual,
            "value iteration finished"
        );
    }

    fn q_value_from(
        &self,
        values: &ValueTable<M::State>,
        state: &M::State,
        action: &M::Action,
    ) -> f64 {
        self.mdp
            .transition_states_and_probs(state, action)
            .iter()
            .map(|(next, probability)| {
                probability
                    * (self.mdp.reward(state, action, next) + self.discount * values.get(next))
            })
            .sum()
    }

    /// Greedy action under the current values
    pub fn get_action(&self, state: &M::State) -> Option<M::Action> {
        self.get_policy(state)
    }

    /// Computed state values
    pub fn values(&self) -> &ValueTable<M::State> {
        &self.values
    }

    /// Largest change made by the final sweep
    #[must_use]
    pub fn last_residual(&self) -> f64 {
        self.last_residual
    }

    /// Number of sweeps run
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The process planned over
    pub fn mdp(&self) -> &M {
        &self.mdp
    }
}

impl<M: MarkovDecisionProcess> ValueEstimator for ValueIterationAgent<M> {
    type State = M::State;
    type Action = M::Action;

    fn get_value(&self, state: &M::State) -> f64 {
        self.values.get(state)
    }

    fn get_q_value(&self, state: &M::State, action: &M::Action) -> f64 {
        self.q_value_from(&self.values, state, action)
    }

    fn get_policy(&self, state: &M::State) -> Option<M::Action> {
        if self.mdp.is_terminal(state) {
            return None;
        }
        best_action(self.mdp.possible_actions(state), |action| {
            self.get_q_value(state, action)
        })
        .map(|(action, _)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type Edge = (&'static str, &'static str, &'static str, f64, f64);

    /// Explicit MDP: `(state, action, next, probability, reward)` rows
    struct TableMdp {
        states: Vec<&'static str>,
        terminals: Vec<&'static str>,
        edges: Vec<Edge>,
    }

    impl MarkovDecisionProcess for TableMdp {
        type State = &'static str;
        type Action = &'static str;

        fn states(&self) -> Vec<&'static str> {
            self.states.clone()
        }

        fn start_state(&self) -> &'static str {
            self.states[0]
        }

        fn possible_actions(&self, state: &&'static str) -> Vec<&'static str> {
            let mut actions: Vec<&'static str> = Vec::new();
            for &(from, action, ..) in &self.edges {
                if from == *state && !actions.contains(&action) {
                    actions.push(action);
                }
            }
            actions
        }

        fn transition_states_and_probs(
            &self,
            state: &&'static str,
            action: &&'static str,
        ) -> Vec<(&'static str, f64)> {
            self.edges
                .iter()
                .filter(|(from, act, ..)| from == state && act == action)
                .map(|&(_, _, to, probability, _)| (to, probability))
                .collect()
        }

        fn reward(&self, state: &&'static str, action: &&'static str, next: &&'static str) -> f64 {
            self.edges
                .iter()
                .find(|(from, act, to, ..)| from == state && act == action && to == next)
                .map_or(0.0, |edge| edge.4)
        }

        fn is_terminal(&self, state: &&'static str) -> bool {
            self.terminals.contains(state)
        }
    }

    fn config(discount: f64, iterations: usize) -> ValueIterationConfig {
        ValueIterationConfig {
            discount,
            iterations,
        }
    }

    fn two_state() -> TableMdp {
        TableMdp {
            states: vec!["A", "B"],
            terminals: vec!["B"],
            edges: vec![("A", "go", "B", 1.0, 1.0)],
        }
    }

    #[test]
    fn test_two_state_values_and_policy() {
        let agent = ValueIterationAgent::new(two_state(), &config(0.9, 10)).unwrap();
        assert_relative_eq!(agent.get_value(&"A"), 1.0);
        assert_relative_eq!(agent.get_value(&"B"), 0.0);
        assert_relative_eq!(agent.get_q_value(&"A", &"go"), 1.0);
        assert_eq!(agent.get_policy(&"A"), Some("go"));
        assert_eq!(agent.get_action(&"A"), Some("go"));
        assert_eq!(agent.get_policy(&"B"), None);
    }

    #[test]
    fn test_zero_iterations_leaves_zero_values() {
        let agent = ValueIterationAgent::new(two_state(), &config(0.9, 0)).unwrap();
        assert_eq!(agent.get_value(&"A"), 0.0);
        assert!(agent.values().is_empty());
    }

    #[test]
    fn test_sweeps_read_a_snapshot() {
        // Listed back to front so an in-place sweep would already
        // propagate B's value into A during the first pass.
        let chain = TableMdp {
            states: vec!["C", "B", "A"],
            terminals: vec!["C"],
            edges: vec![("A", "go", "B", 1.0, 0.0), ("B", "go", "C", 1.0, 1.0)],
        };
        let one = ValueIterationAgent::new(&chain, &config(1.0, 1)).unwrap();
        assert_relative_eq!(one.get_value(&"B"), 1.0);
        assert_relative_eq!(one.get_value(&"A"), 0.0);

        let two = ValueIterationAgent::new(&chain, &config(1.0, 2)).unwrap();
        assert_relative_eq!(two.get_value(&"A"), 1.0);
    }

    #[test]
    fn test_stochastic_fixed_point() {
        // V = max(1, 0.5 * 4 + 0.5 * 0.5 * V) = 8 / 3
        let mdp = TableMdp {
            states: vec!["S", "T"],
            terminals: vec!["T"],
            edges: vec![
                ("S", "safe", "T", 1.0, 1.0),
                ("S", "risky", "T", 0.5, 4.0),
                ("S", "risky", "S", 0.5, 0.0),
            ],
        };
        let agent = ValueIterationAgent::new(mdp, &config(0.5, 100)).unwrap();
        assert_relative_eq!(agent.get_value(&"S"), 8.0 / 3.0, epsilon = 1e-9);
        assert_eq!(agent.get_policy(&"S"), Some("risky"));
        assert!(agent.last_residual() < 1e-9);
    }

    #[test]
    fn test_ties_go_to_first_action() {
        let mdp = TableMdp {
            states: vec!["S", "T"],
            terminals: vec!["T"],
            edges: vec![("S", "left", "T", 1.0, 2.0), ("S", "right", "T", 1.0, 2.0)],
        };
        let agent = ValueIterationAgent::new(mdp, &config(0.9, 5)).unwrap();
        assert_eq!(agent.get_policy(&"S"), Some("left"));
    }

    #[test]
    fn test_actionless_state_keeps_zero() {
        let mdp = TableMdp {
            states: vec!["A", "Dead", "T"],
            terminals: vec!["T"],
            edges: vec![("A", "go", "Dead", 1.0, 1.0)],
        };
        let agent = ValueIterationAgent::new(mdp, &config(0.9, 10)).unwrap();
        assert_eq!(agent.get_value(&"Dead"), 0.0);
        assert_eq!(agent.get_policy(&"Dead"), None);
        assert_relative_eq!(agent.get_value(&"A"), 1.0);
    }

    #[test]
    fn test_values_are_stable_between_queries() {
        let agent = ValueIterationAgent::new(two_state(), &config(0.9, 3)).unwrap();
        let first = agent.get_value(&"A");
        let _ = agent.get_policy(&"A");
        assert_eq!(agent.get_value(&"A"), first);
    }

    #[test]
    fn test_bad_discount_is_rejected() {
        assert!(ValueIterationAgent::new(two_state(), &config(1.5, 3)).is_err());
    }
}
