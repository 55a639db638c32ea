//! Single-agent path finding in a maze

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use indexmap::IndexSet;
use tracing::{debug, warn};
use wayfarer_agent::{breadth_first_search, uniform_cost_search};
use wayfarer_core::{
    Direction, Result, SearchProblem, Successor, WayfarerError, ILLEGAL_ACTION_COST,
};

use crate::grid::{manhattan, step, Maze, Position};

/// Step cost as a function of the cell entered
pub type CostFn = Box<dyn Fn(Position) -> f64 + Send + Sync>;

/// Reach `goal` from `start` inside a maze.
///
/// Keeps an expansion counter and the order in which states were first
/// expanded, for diagnostics.
pub struct PositionSearchProblem {
    maze: Maze,
    start: Position,
    goal: Position,
    cost_fn: CostFn,
    expanded: Cell<usize>,
    visit_history: RefCell<IndexSet<Position>>,
}

impl PositionSearchProblem {
    /// Unit-cost problem from `start` to `goal`
    #[must_use]
    pub fn new(maze: Maze, start: Position, goal: Position) -> Self {
        if maze.is_wall(goal) {
            warn!(?goal, "goal sits on a wall; search will not find it");
        }
        Self {
            maze,
            start,
            goal,
            cost_fn: Box::new(|_| 1.0),
            expanded: Cell::new(0),
            visit_history: RefCell::new(IndexSet::new()),
        }
    }

    /// Replace the step cost function
    #[must_use]
    pub fn with_cost_fn<F>(mut self, cost_fn: F) -> Self
    where
        F: Fn(Position) -> f64 + Send + Sync + 'static,
    {
        self.cost_fn = Box::new(cost_fn);
        self
    }

    /// The maze searched
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Target cell
    #[must_use]
    pub fn goal(&self) -> Position {
        self.goal
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

    fn cost_of(&self, position: Position) -> f64 {
        (self.cost_fn)(position)
    }
}

/// Cost that makes westward cells expensive: `0.5^x`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stay_east_cost(position: Position) -> f64 {
    0.5_f64.powf(position.0 as f64)
}

/// Cost that makes eastward cells expensive: `2^x`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stay_west_cost(position: Position) -> f64 {
    2.0_f64.powf(position.0 as f64)
}

impl SearchProblem for PositionSearchProblem {
    type State = Position;
    type Action = Direction;

    fn starting_state(&self) -> Option<Position> {
        Some(self.start)
    }

    fn is_goal(&self, state: &Position) -> bool {
        *state == self.goal
    }

    fn successor_states(&self, state: &Position) -> Vec<Successor<Position, Direction>> {
        self.expanded.set(self.expanded.get() + 1);
        self.visit_history.borrow_mut().insert(*state);

        self.maze
            .legal_moves(*state)
            .into_iter()
            .map(|direction| {
                let next = step(*state, direction);
                Successor::new(next, direction, self.cost_of(next))
            })
            .collect()
    }

    fn actions_cost(&self, actions: &[Direction]) -> f64 {
        let mut position = self.start;
        let mut total = 0.0;
        for &action in actions {
            position = step(position, action);
            if action == Direction::Stop || self.maze.is_wall(position) {
                return ILLEGAL_ACTION_COST;
            }
            total += self.cost_of(position);
        }
        total
    }
}

/// Straight-line grid distance to the goal
#[allow(clippy::cast_precision_loss)]
pub fn manhattan_heuristic(position: &Position, problem: &PositionSearchProblem) -> f64 {
    manhattan(*position, problem.goal()) as f64
}

/// Euclidean distance to the goal
#[allow(clippy::cast_precision_loss)]
pub fn euclidean_heuristic(position: &Position, problem: &PositionSearchProblem) -> f64 {
    let (gx, gy) = problem.goal();
    let dx = (position.0 - gx) as f64;
    let dy = (position.1 - gy) as f64;
    dx.hypot(dy)
}

/// Reach the nearest of a set of food cells
pub struct AnyFoodSearchProblem<'a> {
    maze: &'a Maze,
    start: Position,
    food: &'a BTreeSet<Position>,
}

impl<'a> AnyFoodSearchProblem<'a> {
    /// Problem from `start` to whichever pellet of `food` is closest
    #[must_use]
    pub fn new(maze: &'a Maze, start: Position, food: &'a BTreeSet<Position>) -> Self {
        Self { maze, start, food }
    }
}

impl SearchProblem for AnyFoodSearchProblem<'_> {
    type State = Position;
    type Action = Direction;

    fn starting_state(&self) -> Option<Position> {
        Some(self.start)
    }

    fn is_goal(&self, state: &Position) -> bool {
        self.food.contains(state)
    }

    fn successor_states(&self, state: &Position) -> Vec<Successor<Position, Direction>> {
        self.maze
            .legal_moves(*state)
            .into_iter()
            .map(|direction| Successor::new(step(*state, direction), direction, 1.0))
            .collect()
    }
}

/// Number of moves on a shortest path from `from` to `to`
///
/// # Errors
///
/// [`WayfarerError::InvalidState`] if either end is a wall and
/// [`WayfarerError::NoPath`] if `to` cannot be reached.
pub fn maze_distance(from: Position, to: Position, maze: &Maze) -> Result<usize> {
    for end in [from, to] {
        if maze.is_wall(end) {
            return Err(WayfarerError::InvalidState(format!("{end:?} is a wall")));
        }
    }
    let target = BTreeSet::from([to]);
    breadth_first_search(&AnyFoodSearchProblem::new(maze, from, &target))?
        .path
        .map(|path| path.actions.len())
        .ok_or_else(|| WayfarerError::NoPath(format!("{from:?} to {to:?}")))
}

/// Eat every pellet by repeatedly walking to the closest one.
///
/// Each segment is found by uniform-cost search and checked move by move
/// against the maze before it is appended to the plan.
///
/// # Errors
///
/// [`WayfarerError::InvalidState`] if `start` is a wall,
/// [`WayfarerError::NoPath`] if some pellet cannot be reached, and
/// [`WayfarerError::InvalidAction`] if a segment walks into a wall.
pub fn closest_dot_plan(
    maze: &Maze,
    start: Position,
    food: &BTreeSet<Position>,
) -> Result<Vec<Direction>> {
    if maze.is_wall(start) {
        return Err(WayfarerError::InvalidState(format!("start {start:?} is a wall")));
    }

    let mut remaining = food.clone();
    let mut position = start;
    let mut plan = Vec::new();
    remaining.remove(&position);

    while !remaining.is_empty() {
        let problem = AnyFoodSearchProblem::new(maze, position, &remaining);
        let segment = uniform_cost_search(&problem)?
            .into_actions()
            .ok_or_else(|| {
                WayfarerError::NoPath(format!(
                    "{} pellets unreachable from {position:?}",
                    remaining.len()
                ))
            })?;

        for action in segment {
            let next = step(position, action);
            if maze.is_wall(next) {
                return Err(WayfarerError::InvalidAction(format!(
                    "{action} from {position:?} runs into a wall"
                )));
            }
            position = next;
            remaining.remove(&position);
            plan.push(action);
        }
    }

    debug!(length = plan.len(), "closest-dot plan complete");
    Ok(plan)
}
