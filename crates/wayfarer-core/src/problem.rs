//! Search problems consumed by the graph-search core

use crate::{Action, State};

/// Cost reported for an action sequence that cannot be replayed.
///
/// Illegal replays map to this sentinel instead of an error so that cost
/// comparisons keep working uniformly.
pub const ILLEGAL_ACTION_COST: f64 = 999_999.0;

/// One edge out of a state
#[derive(Debug, Clone, PartialEq)]
pub struct Successor<S, A> {
    /// State reached
    pub state: S,
    /// Action that reaches it
    pub action: A,
    /// Cost of this single step
    pub cost: f64,
}

impl<S, A> Successor<S, A> {
    /// Create a new successor
    pub fn new(state: S, action: A, cost: f64) -> Self {
        Self {
            state,
            action,
            cost,
        }
    }
}

/// A state space with a start, a goal test and a successor relation.
///
/// The search core treats problems as read-only. Implementations may keep
/// interior counters (expansions, visit history) for diagnostics.
pub trait SearchProblem {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// The start state; `None` marks a malformed problem
    fn starting_state(&self) -> Option<Self::State>;

    /// Whether `state` satisfies the goal
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Every `(next_state, action, step_cost)` out of `state`
    fn successor_states(&self, state: &Self::State) -> Vec<Successor<Self::State, Self::Action>>;

    /// Total cost of replaying `actions` from the start.
    ///
    /// Returns [`ILLEGAL_ACTION_COST`] when a step is not a legal move.
    fn actions_cost(&self, actions: &[Self::Action]) -> f64 {
        let Some(mut state) = self.starting_state() else {
            return ILLEGAL_ACTION_COST;
        };
        let mut total = 0.0;
        for action in actions {
            let next = self
                .successor_states(&state)
                .into_iter()
                .find(|successor| &successor.action == action);
            match next {
                Some(successor) => {
                    total += successor.cost;
                    state = successor.state;
                }
                None => return ILLEGAL_ACTION_COST,
            }
        }
        total
    }
}

impl<P: SearchProblem + ?Sized> SearchProblem for &P {
    type State = P::State;
    type Action = P::Action;

    fn starting_state(&self) -> Option<Self::State> {
        (**self).starting_state()
    }

    fn is_goal(&self, state: &Self::State) -> bool {
        (**self).is_goal(state)
    }

    fn successor_states(&self, state: &Self::State) -> Vec<Successor<Self::State, Self::Action>> {
        (**self).successor_states(state)
    }

    fn actions_cost(&self, actions: &[Self::Action]) -> f64 {
        (**self).actions_cost(actions)
    }
}

/// Replay `actions` through the successor relation.
///
/// Returns the state reached, or `None` if some action is not available
/// where it is taken.
pub fn replay<P: SearchProblem>(problem: &P, actions: &[P::Action]) -> Option<P::State> {
    let mut state = problem.starting_state()?;
    for action in actions {
        state = problem
            .successor_states(&state)
            .into_iter()
            .find(|successor| &successor.action == action)?
            .state;
    }
    Some(state)
}
