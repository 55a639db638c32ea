//! Wall grids and text layouts for maze problems
//!
//! Coordinates are `(x, y)` with `y` growing upwards, so the last line of a
//! text layout is row `y = 0`.

use std::collections::BTreeSet;

use wayfarer_core::{Direction, Result, WayfarerError};

/// A grid cell `(x, y)`
pub type Position = (i64, i64);

/// Cell reached by moving one step in `direction`
#[must_use]
pub fn step(position: Position, direction: Direction) -> Position {
    let (dx, dy) = direction.vector();
    (position.0 + dx, position.1 + dy)
}

/// Manhattan distance between two cells
#[must_use]
pub fn manhattan(a: Position, b: Position) -> i64 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Rectangular grid of walls
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Maze {
    width: i64,
    height: i64,
    walls: Vec<bool>,
}

impl Maze {
    /// A grid with no walls
    #[must_use]
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width: to_coord(width),
            height: to_coord(height),
            walls: vec![false; width * height],
        }
    }

    /// A grid whose outer ring is wall
    #[must_use]
    pub fn bordered(width: usize, height: usize) -> Self {
        let mut maze = Self::open(width, height);
        for x in 0..maze.width {
            maze.set_wall((x, 0), true);
            maze.set_wall((x, maze.height - 1), true);
        }
        for y in 0..maze.height {
            maze.set_wall((0, y), true);
            maze.set_wall((maze.width - 1, y), true);
        }
        maze
    }

    /// Add a wall at `position`
    #[must_use]
    pub fn with_wall(mut self, position: Position) -> Self {
        self.set_wall(position, true);
        self
    }

    /// Add walls at every position in `positions`
    #[must_use]
    pub fn with_walls<I: IntoIterator<Item = Position>>(mut self, positions: I) -> Self {
        for position in positions {
            self.set_wall(position, true);
        }
        self
    }

    /// Set or clear the wall at `position`; out-of-bounds positions are ignored
    pub fn set_wall(&mut self, position: Position, wall: bool) {
        if let Some(index) = self.index(position) {
            self.walls[index] = wall;
        }
    }

    /// Whether `position` is blocked; anything outside the grid is
    #[must_use]
    pub fn is_wall(&self, position: Position) -> bool {
        self.index(position).map_or(true, |index| self.walls[index])
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

    /// Moves from `position` that do not run into a wall, in
    /// [`Direction::CARDINAL`] order
    #[must_use]
    pub fn legal_moves(&self, position: Position) -> Vec<Direction> {
        Direction::CARDINAL
            .into_iter()
            .filter(|&direction| !self.is_wall(step(position, direction)))
            .collect()
    }

    /// Every open cell, column by column
    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.width)
            .flat_map(move |x| (0..self.height).map(move |y| (x, y)))
            .filter(|&position| !self.is_wall(position))
    }

    fn index(&self, (x, y): Position) -> Option<usize> {
        if (0..self.width).contains(&x) && (0..self.height).contains(&y) {
            usize::try_from(y * self.width + x).ok()
        } else {
            None
        }
    }
}

fn to_coord(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// A maze together with a start cell and food pellets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Walls
    pub maze: Maze,
    /// Agent start, if the layout marks one
    pub start: Option<Position>,
    /// Food pellets
    pub food: BTreeSet<Position>,
}

impl Layout {
    /// Parse a text layout: `%` wall, `P` start, `.` food, space open.
    ///
    /// # Errors
    ///
    /// Fails on ragged rows, unknown characters, several starts or an empty
    /// layout.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(WayfarerError::InvalidState("empty layout".to_string()));
        }

        let height = rows.len();
        let mut maze = Maze::open(width, height);
        let mut start = None;
        let mut food = BTreeSet::new();

        for (row_index, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(WayfarerError::InvalidState(format!(
                    "layout row {row_index} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            let y = to_coord(height - 1 - row_index);
            for (column, cell) in row.chars().enumerate() {
                let position = (to_coord(column), y);
                match cell {
                    '%' => maze.set_wall(position, true),
                    '.' => {
                        food.insert(position);
                    }
                    'P' => {
                        if start.replace(position).is_some() {
                            return Err(WayfarerError::InvalidState(
                                "layout has more than one start".to_string(),
                            ));
                        }
                    }
                    ' ' => {}
                    other => {
                        return Err(WayfarerError::InvalidState(format!(
                            "unknown layout character {other:?}"
                        )))
                    }
                }
            }
        }

        Ok(Self { maze, start, food })
    }

    /// Start cell, failing when the layout has none
    ///
    /// # Errors
    ///
    /// Returns [`WayfarerError::MissingStartState`] without a `P` cell.
    pub fn require_start(&self) -> Result<Position> {
        self.start.ok_or(WayfarerError::MissingStartState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
%%%%%
%P .%
% %.%
%%%%%";

    #[test]
    fn test_parse_flips_rows() {
        let layout = Layout::parse(SMALL).unwrap();
        assert_eq!(layout.maze.width(), 5);
        assert_eq!(layout.maze.height(), 4);
        assert_eq!(layout.start, Some((1, 2)));
        assert_eq!(layout.food, BTreeSet::from([(3, 2), (3, 1)]));
        assert!(layout.maze.is_wall((2, 1)));
        assert!(!layout.maze.is_wall((1, 1)));
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let maze = Maze::open(3, 3);
        assert!(maze.is_wall((-1, 0)));
        assert!(maze.is_wall((0, 3)));
        assert!(!maze.is_wall((2, 2)));
    }

    #[test]
    fn test_bordered_and_legal_moves() {
        let maze = Maze::bordered(5, 5).with_wall((2, 3));
        assert_eq!(
            maze.legal_moves((2, 2)),
            vec![Direction::South, Direction::East, Direction::West]
        );
        assert_eq!(maze.legal_moves((1, 1)), vec![Direction::North, Direction::East]);
        assert_eq!(maze.open_cells().count(), 8);
    }

    #[test]
    fn test_bad_layouts() {
        assert!(Layout::parse("").is_err());
        assert!(Layout::parse("%%%\n%P").is_err());
        assert!(Layout::parse("%P%\n%P%").is_err());
        assert!(Layout::parse("%x%").is_err());
    }

    #[test]
    fn test_step_and_manhattan() {
        assert_eq!(step((2, 2), Direction::North), (2, 3));
        assert_eq!(step((2, 2), Direction::Stop), (2, 2));
        assert_eq!(manhattan((0, 0), (3, -4)), 7);
    }
}
