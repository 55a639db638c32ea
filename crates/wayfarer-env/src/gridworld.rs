//! Noisy gridworld MDP
//!
//! The agent moves on a grid of open cells, walls and exits. A move goes
//! where intended with probability `1 - noise` and slips to either side with
//! `noise / 2` each; running into a wall or the border leaves it in place.
//! From an exit cell the only action is [`GridAction::Exit`], which collects
//! the exit's reward and ends the episode.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wayfarer_core::{Action, Direction, MarkovDecisionProcess, Result, WayfarerError};

use crate::grid::{step, Position};

/// Names accepted by [`GridWorld::named`]
pub const LAYOUT_NAMES: [&str; 5] = ["book", "bridge", "discount", "cliff", "maze"];

const BOOK: &str = "
_ _ _ 1
_ # _ -1
S _ _ _";

const BRIDGE: &str = "
# -100 -100 -100 -100 -100 #
1 S    _    _    _    _   10
# -100 -100 -100 -100 -100 #";

const DISCOUNT: &str = "
_   _   _   _   _
_   #   _   _   _
_   #   1   #   10
S   _   _   _   _
-10 -10 -10 -10 -10";

const CLIFF: &str = "
_    _    _    _    _
S    _    _    _    10
-100 -100 -100 -100 -100";

const MAZE: &str = "
_ _ _ 1
# # _ #
_ # _ _
_ # # _
S _ _ _";

/// Contents of one gridworld square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Walkable
    Open,
    /// Blocked
    Wall,
    /// Walkable, and where episodes begin
    Start,
    /// Leaving from here pays the reward and ends the episode
    Exit(f64),
}

/// Gridworld state: a square, or the absorbing end state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GridState {
    /// Standing on a cell
    At(Position),
    /// Episode over
    Terminal,
}

impl GridState {
    /// Cell position, `None` for the terminal state
    #[must_use]
    pub fn position(self) -> Option<Position> {
        match self {
            Self::At(position) => Some(position),
            Self::Terminal => None,
        }
    }
}

/// Gridworld actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GridAction {
    /// Move up
    North,
    /// Move left
    West,
    /// Move down
    South,
    /// Move right
    East,
    /// Collect an exit reward
    Exit,
}

impl GridAction {
    /// Moves offered on ordinary cells
    pub const MOVES: [GridAction; 4] = [
        GridAction::North,
        GridAction::West,
        GridAction::South,
        GridAction::East,
    ];

    /// Compass direction of a move; `None` for [`GridAction::Exit`]
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::North => Some(Direction::North),
            Self::West => Some(Direction::West),
            Self::South => Some(Direction::South),
            Self::East => Some(Direction::East),
            Self::Exit => None,
        }
    }
}

impl Action for GridAction {}

impl fmt::Display for GridAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::West => "west",
            Self::South => "south",
            Self::East => "east",
            Self::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// A rectangular gridworld with slip noise and a per-move living reward
#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    width: i64,
    height: i64,
    cells: Vec<Cell>,
    start: Position,
    noise: f64,
    living_reward: f64,
}

impl GridWorld {
    /// Parse a whitespace-separated layout, top row first: `_` open, `#`
    /// wall, `S` start, a number is an exit paying that much.
    ///
    /// Noise defaults to 0.2 and the living reward to 0.
    ///
    /// # Errors
    ///
    /// Fails on unknown tokens, ragged rows, or a start count other than one.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<Vec<&str>> = text
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(WayfarerError::InvalidState("empty gridworld".to_string()));
        }
        let height = rows.len();

        let mut cells = vec![Cell::Open; width * height];
        let mut start = None;
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(WayfarerError::InvalidState(format!(
                    "gridworld row {row_index} has {} cells, expected {width}",
                    row.len()
                )));
            }
            let y = height - 1 - row_index;
            for (x, token) in row.iter().enumerate() {
                let cell = parse_cell(token)?;
                if cell == Cell::Start && start.replace((x, y)).is_some() {
                    return Err(WayfarerError::InvalidState(
                        "gridworld has more than one start".to_string(),
                    ));
                }
                cells[y * width + x] = cell;
            }
        }

        let (x, y) = start.ok_or(WayfarerError::MissingStartState)?;
        Ok(Self {
            width: to_coord(width),
            height: to_coord(height),
            cells,
            start: (to_coord(x), to_coord(y)),
            noise: 0.2,
            living_reward: 0.0,
        })
    }

    /// Build a stock layout by name, see [`LAYOUT_NAMES`]
    ///
    /// # Errors
    ///
    /// Unknown names are an [`WayfarerError::InvalidParameter`].
    pub fn named(name: &str) -> Result<Self> {
        let text = match name {
            "book" => BOOK,
            "bridge" => BRIDGE,
            "discount" => DISCOUNT,
            "cliff" => CLIFF,
            "maze" => MAZE,
            other => {
                return Err(WayfarerError::InvalidParameter(format!(
                    "unknown gridworld {other:?}, expected one of {LAYOUT_NAMES:?}"
                )))
            }
        };
        Self::parse(text)
    }

    /// Three-by-four grid with a +1 and a -1 exit
    ///
    /// # Errors
    ///
    /// Never in practice; the layout is fixed.
    pub fn book() -> Result<Self> {
        Self::named("book")
    }

    /// Narrow bridge between a +1 and a +10 exit, lined with -100 pits
    ///
    /// # Errors
    ///
    /// Never in practice; the layout is fixed.
    pub fn bridge() -> Result<Self> {
        Self::named("bridge")
    }

    /// Near +1 and far +10 exits above a -10 cliff
    ///
    /// # Errors
    ///
    /// Never in practice; the layout is fixed.
    pub fn discount() -> Result<Self> {
        Self::named("discount")
    }

    /// Start beside a -100 cliff, +10 exit at the far end
    ///
    /// # Errors
    ///
    /// Never in practice; the layout is fixed.
    pub fn cliff() -> Result<Self> {
        Self::named("cliff")
    }

    /// Winding corridor to a single +1 exit
    ///
    /// # Errors
    ///
    /// Never in practice; the layout is fixed.
    pub fn maze() -> Result<Self> {
        Self::named("maze")
    }

    /// Replace the slip probability
    ///
    /// # Errors
    ///
    /// Rejects noise outside `[0, 1]`.
    pub fn with_noise(mut self, noise: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise) {
            return Err(WayfarerError::InvalidParameter(format!(
                "noise must lie in [0, 1], got {noise}"
            )));
        }
        self.noise = noise;
        Ok(self)
    }

    /// Replace the reward paid for every move
    #[must_use]
    pub fn with_living_reward(mut self, living_reward: f64) -> Self {
        self.living_reward = living_reward;
        self
    }

    /// Slip probability
    #[must_use]
    pub fn noise(&self) -> f64 {
        self.noise
    }

    /// Reward for every move
    #[must_use]
    pub fn living_reward(&self) -> f64 {
        self.living_reward
    }

    /// Grid width
    #[must_use]
    pub fn width(&self) -> i64 {
        self.width
    }

    /// Grid height
    #[must_use]
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Contents of `position`, `None` outside the grid
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Cell> {
        let (x, y) = position;
        if !(0..self.width).contains(&x) || !(0..self.height).contains(&y) {
            return None;
        }
        usize::try_from(y * self.width + x)
            .ok()
            .and_then(|index| self.cells.get(index).copied())
    }

    fn exit_reward(&self, position: Position) -> Option<f64> {
        match self.cell(position) {
            Some(Cell::Exit(reward)) => Some(reward),
            _ => None,
        }
    }

    fn is_open(&self, position: Position) -> bool {
        !matches!(self.cell(position), None | Some(Cell::Wall))
    }

    /// Where a move from `position` lands, staying put on a bump
    fn destination(&self, position: Position, direction: Direction) -> Position {
        let next = step(position, direction);
        if self.is_open(next) {
            next
        } else {
            position
        }
    }
}

fn parse_cell(token: &str) -> Result<Cell> {
    match token {
        "_" => Ok(Cell::Open),
        "#" => Ok(Cell::Wall),
        "S" => Ok(Cell::Start),
        other => match other.parse::<f64>() {
            Ok(reward) if reward.is_finite() => Ok(Cell::Exit(reward)),
            Ok(_) => Err(WayfarerError::InvalidState(format!(
                "exit reward {other:?} is not finite"
            ))),
            Err(_) => Err(WayfarerError::InvalidState(format!(
                "unknown gridworld cell {other:?}"
            ))),
        },
    }
}

fn to_coord(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl MarkovDecisionProcess for GridWorld {
    type State = GridState;
    type Action = GridAction;

    /// Terminal first, then every non-wall cell column by column
    fn states(&self) -> Vec<GridState> {
        let cells = (0..self.width)
            .flat_map(|x| (0..self.height).map(move |y| (x, y)))
            .filter(|&position| self.is_open(position))
            .map(GridState::At);
        std::iter::once(GridState::Terminal).chain(cells).collect()
    }

    fn start_state(&self) -> GridState {
        GridState::At(self.start)
    }

    fn possible_actions(&self, state: &GridState) -> Vec<GridAction> {
        match state {
            GridState::Terminal => Vec::new(),
            GridState::At(position) if self.exit_reward(*position).is_some() => {
                vec![GridAction::Exit]
            }
            GridState::At(_) => GridAction::MOVES.to_vec(),
        }
    }

    fn transition_states_and_probs(
        &self,
        state: &GridState,
        action: &GridAction,
    ) -> Vec<(GridState, f64)> {
        let GridState::At(position) = *state else {
            return Vec::new();
        };
        if self.exit_reward(position).is_some() {
            return vec![(GridState::Terminal, 1.0)];
        }
        // Exit off an exit cell goes nowhere.
        let Some(direction) = action.direction() else {
            return vec![(*state, 1.0)];
        };

        let [left, right] = direction.perpendicular();
        let mut merged: IndexMap<GridState, f64> = IndexMap::new();
        for (heading, probability) in [
            (direction, 1.0 - self.noise),
            (left, self.noise / 2.0),
            (right, self.noise / 2.0),
        ] {
            let next = GridState::At(self.destination(position, heading));
            *merged.entry(next).or_insert(0.0) += probability;
        }
        merged
            .into_iter()
            .filter(|&(_, probability)| probability > 0.0)
            .collect()
    }

    fn reward(&self, state: &GridState, _action: &GridAction, _next_state: &GridState) -> f64 {
        match state {
            GridState::Terminal => 0.0,
            GridState::At(position) => self.exit_reward(*position).unwrap_or(self.living_reward),
        }
    }

    fn is_terminal(&self, state: &GridState) -> bool {
        matches!(state, GridState::Terminal)
    }
}
