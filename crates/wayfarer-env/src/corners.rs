//! Visit all four corners of a maze

use std::cell::{Cell, RefCell};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::warn;
use wayfarer_core::{
    Direction, Result, SearchProblem, Successor, WayfarerError, ILLEGAL_ACTION_COST,
};

use crate::grid::{manhattan, step, Maze, Position};

/// Position plus which corners have been reached, in
/// [`CornersProblem::corners`] order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CornersState {
    /// Agent position
    pub position: Position,
    /// Corner flags
    pub visited: [bool; 4],
}

/// Find a shortest tour touching every inner corner of a bordered maze
pub struct CornersProblem {
    maze: Maze,
    corners: [Position; 4],
    start: CornersState,
    expanded: Cell<usize>,
    visit_history: RefCell<IndexSet<Position>>,
}

impl CornersProblem {
    /// Build the problem. The corners are the four cells just inside the
    /// border; a start on a corner counts as visiting it.
    ///
    /// # Errors
    ///
    /// Fails if `start` is a wall.
    pub fn new(maze: Maze, start: Position) -> Result<Self> {
        if maze.is_wall(start) {
            return Err(WayfarerError::InvalidState(format!("start {start:?} is a wall")));
        }
        let top = maze.height() - 2;
        let right = maze.width() - 2;
        let corners = [(1, 1), (1, top), (right, 1), (right, top)];
        for corner in corners {
            if maze.is_wall(corner) {
                warn!(?corner, "corner is a wall and can never be visited");
            }
        }

        let mut problem = Self {
            maze,
            corners,
            start: CornersState {
                position: start,
                visited: [false; 4],
            },
            expanded: Cell::new(0),
            visit_history: RefCell::new(IndexSet::new()),
        };
        problem.start = problem.arrive(problem.start);
        Ok(problem)
    }

    /// Corner cells: bottom-left, top-left, bottom-right, top-right
    #[must_use]
    pub fn corners(&self) -> &[Position; 4] {
        &self.corners
    }

    /// The maze searched
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Calls to `successor_states` so far
    #[must_use]
    pub fn expanded(&self) -> usize {
        self.expanded.get()
    }

    /// Distinct positions expanded, in first-expansion order
    pub fn visit_history(&self) -> Vec<Position> {
        self.visit_history.borrow().iter().copied().collect()
    }

    /// Mark the corner `state` stands on, if any
    fn arrive(&self, mut state: CornersState) -> CornersState {
        for (flag, corner) in state.visited.iter_mut().zip(self.corners) {
            if corner == state.position {
                *flag = true;
            }
        }
        state
    }
}

impl SearchProblem for CornersProblem {
    type State = CornersState;
    type Action = Direction;

    fn starting_state(&self) -> Option<CornersState> {
        Some(self.start)
    }

    fn is_goal(&self, state: &CornersState) -> bool {
        state.visited.iter().all(|&visited| visited)
    }

    fn successor_states(&self, state: &CornersState) -> Vec<Successor<CornersState, Direction>> {
        self.expanded.set(self.expanded.get() + 1);
        self.visit_history.borrow_mut().insert(state.position);

        self.maze
            .legal_moves(state.position)
            .into_iter()
            .map(|direction| {
                let next = self.arrive(CornersState {
                    position: step(state.position, direction),
                    visited: state.visited,
                });
                Successor::new(next, direction, 1.0)
            })
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn actions_cost(&self, actions: &[Direction]) -> f64 {
        let mut position = self.start.position;
        for &action in actions {
            position = step(position, action);
            if action == Direction::Stop || self.maze.is_wall(position) {
                return ILLEGAL_ACTION_COST;
            }
        }
        actions.len() as f64
    }
}

/// Farthest Manhattan distance to a corner not yet visited.
///
/// Admissible and consistent: every corner still has to be reached, and
/// one move changes each distance by at most one.
#[allow(clippy::cast_precision_loss)]
pub fn corners_heuristic(state: &CornersState, problem: &CornersProblem) -> f64 {
    problem
        .corners()
        .iter()
        .zip(state.visited)
        .filter(|&(_, visited)| !visited)
        .map(|(&corner, _)| manhattan(state.position, corner))
        .max()
        .unwrap_or(0) as f64
}
