//! Parameter settings that produce particular optimal policies
//!
//! Each answer is a `(discount, noise, living reward)` setting for one of
//! the stock gridworlds. Applied to the grid and planned over with value
//! iteration, it makes the greedy policy behave as described.

use serde::{Deserialize, Serialize};
use wayfarer_core::{Result, ValueIterationConfig};

use crate::gridworld::GridWorld;

/// A gridworld parameter setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisAnswer {
    /// Discount used by the planner
    pub discount: f64,
    /// Slip probability of the grid
    pub noise: f64,
    /// Per-move reward; `None` keeps the grid's own
    pub living_reward: Option<f64>,
}

impl AnalysisAnswer {
    /// Set noise and living reward on `grid`
    ///
    /// # Errors
    ///
    /// Rejects noise outside `[0, 1]`.
    pub fn apply(&self, grid: GridWorld) -> Result<GridWorld> {
        let grid = grid.with_noise(self.noise)?;
        Ok(match self.living_reward {
            Some(reward) => grid.with_living_reward(reward),
            None => grid,
        })
    }

    /// Planner settings for this answer
    #[must_use]
    pub fn value_iteration_config(&self, iterations: usize) -> ValueIterationConfig {
        ValueIterationConfig {
            discount: self.discount,
            iterations,
        }
    }
}

/// Bridge grid: cross the bridge to the far exit
#[must_use]
pub fn question2() -> AnalysisAnswer {
    AnalysisAnswer {
        discount: 0.9,
        noise: 0.01,
        living_reward: None,
    }
}

/// Discount grid: close exit, risking the cliff
#[must_use]
pub fn question3a() -> AnalysisAnswer {
    AnalysisAnswer {
        discount: 0.9,
        noise: 0.2,
        living_reward: Some(-4.0),
    }
}

/// Discount grid: close exit, avoiding the cliff
#[must_use]
pub fn question3b() -> AnalysisAnswer {
    AnalysisAnswer {
        discount: 0.2,
        noise: 0.2,
        living_reward: Some(0.0),
    }
}

/// Discount grid: distant exit, risking the cliff
#[must_use]
pub fn question3c() -> AnalysisAnswer {
    AnalysisAnswer {
        discount: 0.9,
        noise: 0.2,
        living_reward: Some(-1.0),
    }
}

/// Discount grid: distant exit, avoiding the cliff
#[must_use]
pub fn question3d() -> AnalysisAnswer {
    AnalysisAnswer {
        discount: 0.9,
        noise: 0.2,
        living_reward: Some(0.0),
    }
}

/// Discount grid: never leave
#[must_use]
pub fn question3e() -> AnalysisAnswer {
    AnalysisAnswer {
        discount: 0.9,
        noise: 0.2,
        living_reward: Some(10.0),
    }
}

/// `(epsilon, learning rate)` letting a Q-learner find the bridge crossing
/// within fifty episodes. No such pair exists.
#[must_use]
pub fn question6() -> Option<(f64, f64)> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;
    use crate::gridworld::{GridAction, GridState};
    use wayfarer_agent::ValueIterationAgent;
    use wayfarer_core::MarkovDecisionProcess;

    /// Follow the greedy policy without slipping. Returns the cells walked
    /// and the exit taken, if any.
    fn walk(answer: AnalysisAnswer, layout: &str) -> (Vec<Position>, Option<Position>) {
        let grid = answer.apply(GridWorld::named(layout).unwrap()).unwrap();
        let steady = grid.clone().with_noise(0.0).unwrap();
        let agent = ValueIterationAgent::new(grid, &answer.value_iteration_config(100)).unwrap();

        let mut state = steady.start_state();
        let mut path = Vec::new();
        for _ in 0..50 {
            let position = state.position().unwrap();
            path.push(position);
            match agent.get_action(&state) {
                Some(GridAction::Exit) => return (path, Some(position)),
                Some(action) => state = steady.transition_states_and_probs(&state, &action)[0].0,
                None => break,
            }
        }
        (path, None)
    }

    fn hugs_cliff(path: &[Position]) -> bool {
        path.iter().skip(1).any(|&(_, y)| y == 1)
    }

    #[test]
    fn test_bridge_is_crossed() {
        let (path, exit) = walk(question2(), "bridge");
        assert_eq!(exit, Some((6, 1)));
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_bridge_default_noise_turns_back() {
        let grid = GridWorld::bridge().unwrap();
        let agent =
            ValueIterationAgent::new(grid, &question2().value_iteration_config(100)).unwrap();
        assert_eq!(agent.get_action(&GridState::At((1, 1))), Some(GridAction::West));
    }

    #[test]
    fn test_close_exit_risking_cliff() {
        let (path, exit) = walk(question3a(), "discount");
        assert_eq!(exit, Some((2, 2)));
        assert!(hugs_cliff(&path));
    }

    #[test]
    fn test_close_exit_avoiding_cliff() {
        let (path, exit) = walk(question3b(), "discount");
        assert_eq!(exit, Some((2, 2)));
        assert!(!hugs_cliff(&path));
    }

    #[test]
    fn test_distant_exit_risking_cliff() {
        let (path, exit) = walk(question3c(), "discount");
        assert_eq!(exit, Some((4, 2)));
        assert!(hugs_cliff(&path));
    }

    #[test]
    fn test_distant_exit_avoiding_cliff() {
        let (path, exit) = walk(question3d(), "discount");
        assert_eq!(exit, Some((4, 2)));
        assert!(!hugs_cliff(&path));
    }

    #[test]
    fn test_never_exit() {
        let (_, exit) = walk(question3e(), "discount");
        assert_eq!(exit, None);
    }

    #[test]
    fn test_living_reward_kept_when_unset() {
        let grid = GridWorld::bridge().unwrap().with_living_reward(-0.5);
        let applied = question2().apply(grid).unwrap();
        assert_eq!(applied.living_reward(), -0.5);
        assert_eq!(applied.noise(), 0.01);
        assert_eq!(question6(), None);
    }
}
