//! Eat every food pellet in a maze

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use wayfarer_core::{
    Direction, Result, SearchProblem, Successor, WayfarerError, ILLEGAL_ACTION_COST,
};

use crate::grid::{step, Layout, Maze, Position};
use crate::position::maze_distance;

/// Agent position plus the pellets still uneaten
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodState {
    /// Agent position
    pub position: Position,
    /// Remaining food
    pub food: BTreeSet<Position>,
}

/// Find a shortest walk that eats all food
pub struct FoodSearchProblem {
    maze: Maze,
    start: FoodState,
    expanded: Cell<usize>,
    distances: RefCell<HashMap<(Position, Position), Option<usize>>>,
}

impl FoodSearchProblem {
    /// Problem starting at `start`; food under the start is eaten at once
    ///
    /// # Errors
    ///
    /// Fails if `start` is a wall.
    pub fn new(maze: Maze, start: Position, mut food: BTreeSet<Position>) -> Result<Self> {
        if maze.is_wall(start) {
            return Err(WayfarerError::InvalidState(format!("start {start:?} is a wall")));
        }
        food.remove(&start);
        Ok(Self {
            maze,
            start: FoodState {
                position: start,
                food,
            },
            expanded: Cell::new(0),
            distances: RefCell::new(HashMap::new()),
        })
    }

    /// Problem over a parsed layout
    ///
    /// # Errors
    ///
    /// Fails if the layout has no start.
    pub fn from_layout(layout: &Layout) -> Result<Self> {
        Self::new(layout.maze.clone(), layout.require_start()?, layout.food.clone())
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

    /// Maze distance between two cells, memoised; `None` when unreachable
    pub fn distance(&self, a: Position, b: Position) -> Option<usize> {
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(&known) = self.distances.borrow().get(&key) {
            return known;
        }
        let computed = maze_distance(a, b, &self.maze).ok();
        self.distances.borrow_mut().insert(key, computed);
        computed
    }
}

impl SearchProblem for FoodSearchProblem {
    type State = FoodState;
    type Action = Direction;

    fn starting_state(&self) -> Option<FoodState> {
        Some(self.start.clone())
    }

    fn is_goal(&self, state: &FoodState) -> bool {
        state.food.is_empty()
    }

    fn successor_states(&self, state: &FoodState) -> Vec<Successor<FoodState, Direction>> {
        self.expanded.set(self.expanded.get() + 1);
        self.maze
            .legal_moves(state.position)
            .into_iter()
            .map(|direction| {
                let position = step(state.position, direction);
                let mut food = state.food.clone();
                food.remove(&position);
                Successor::new(FoodState { position, food }, direction, 1.0)
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

/// Maze distance to the farthest remaining pellet.
///
/// Every pellet must still be reached, so this never overestimates.
/// Unreachable food makes the state a dead end (infinite estimate).
#[allow(clippy::cast_precision_loss)]
pub fn food_heuristic(state: &FoodState, problem: &FoodSearchProblem) -> f64 {
    state
        .food
        .iter()
        .map(|&pellet| {
            problem
                .distance(state.position, pellet)
                .map_or(f64::INFINITY, |distance| distance as f64)
        })
        .fold(0.0, f64::max)
}
