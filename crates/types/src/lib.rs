//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, HTTP API, AI protocol).
//!
//! # Coordinates
//!
//! Positions are `(row, col)` pairs of non-negative integers:
//!
//! - **row** grows downwards (row 0 is the top border)
//! - **col** grows to the right (col 0 is the left border)
//!
//! A step that would leave the non-negative quadrant (e.g. `Up` from row 0)
//! has no representable target; see [`Position::step`].
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_MAZE_WIDTH` | 55 | Maze columns (odd) |
//! | `DEFAULT_MAZE_HEIGHT` | 35 | Maze rows (odd) |
//! | `MIN_MAZE_DIMENSION` | 3 | Smallest carveable dimension |
//! | `DEFAULT_HTTP_PORT` | 8080 | HTTP API port |
//! | `DEFAULT_AI_PORT` | 8081 | AI tool server port |
//! | `PORT_RANGE` | 100 | Ports probed when the preferred one is taken |
//! | `TICK_MS` | 50 | Terminal loop input poll interval |
//!
//! # Examples
//!
//! ```
//! use tui_maze_types::{Direction, MoveOutcome, Position};
//!
//! let dir = Direction::from_str("UP").unwrap();
//! assert_eq!(dir, Direction::Up);
//!
//! let pos = Position::new(3, 1);
//! assert_eq!(pos.step(Direction::Right), Some(Position::new(3, 2)));
//! assert_eq!(Position::new(0, 4).step(Direction::Up), None);
//!
//! assert_eq!(MoveOutcome::OutOfBounds.as_str(), "out_of_bounds");
//! ```

/// Default maze width in cells (55 columns)
pub const DEFAULT_MAZE_WIDTH: usize = 55;

/// Default maze height in cells (35 rows)
pub const DEFAULT_MAZE_HEIGHT: usize = 35;

/// Smallest dimension that still has one carveable lattice cell inside the border
pub const MIN_MAZE_DIMENSION: usize = 3;

/// Default bind address for both servers
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default AI tool server port
pub const DEFAULT_AI_PORT: u16 = 8081;

/// Number of consecutive ports probed when the preferred port is taken
pub const PORT_RANGE: u16 = 100;

/// Terminal loop input poll interval in milliseconds
pub const TICK_MS: u64 = 50;

/// Number of events retained by the event bus history
pub const EVENT_HISTORY_LIMIT: usize = 100;

/// A cell coordinate on the maze grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position one unit step away in `direction`.
    ///
    /// Returns `None` when the step would need a negative coordinate.
    /// `Wait` returns the position unchanged.
    ///
    /// ```
    /// use tui_maze_types::{Direction, Position};
    ///
    /// let p = Position::new(1, 1);
    /// assert_eq!(p.step(Direction::Up), Some(Position::new(0, 1)));
    /// assert_eq!(p.step(Direction::Down), Some(Position::new(2, 1)));
    /// assert_eq!(p.step(Direction::Left), Some(Position::new(1, 0)));
    /// assert_eq!(p.step(Direction::Wait), Some(p));
    /// assert_eq!(Position::new(1, 0).step(Direction::Left), None);
    /// ```
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (row, col) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row.checked_add(1)?, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col.checked_add(1)?),
            Direction::Wait => (self.row, self.col),
        };
        Some(Self { row, col })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Maze dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MazeSize {
    pub width: usize,
    pub height: usize,
}

impl MazeSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check whether `pos` lies inside `[0, height) x [0, width)`.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }
}

impl Default for MazeSize {
    fn default() -> Self {
        Self::new(DEFAULT_MAZE_WIDTH, DEFAULT_MAZE_HEIGHT)
    }
}

/// Player commands accepted by the engine.
///
/// These directions are used by keyboard input, the HTTP API and AI tools alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Row - 1
    Up,
    /// Row + 1
    Down,
    /// Col - 1
    Left,
    /// Col + 1
    Right,
    /// Spend a turn without moving
    Wait,
}

impl Direction {
    /// All directions in wire order.
    pub const ALL: [Direction; 5] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Wait,
    ];

    /// Parse a direction token (case-insensitive, surrounding whitespace ignored)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_maze_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str(" Left "), Some(Direction::Left));
    /// assert_eq!(Direction::from_str("WAIT"), Some(Direction::Wait));
    /// assert_eq!(Direction::from_str("north"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "wait" => Some(Direction::Wait),
            _ => None,
        }
    }

    /// Lowercase wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Wait => "wait",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result category of a move attempt.
///
/// None of these are errors: callers branch on them.
/// - **Success**: the move (or wait) was accepted
/// - **Wall**: the target cell is a wall
/// - **OutOfBounds**: the target cell lies outside the maze
/// - **AlreadyAtExit**: the level is completed; nothing changes until reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    Success,
    Wall,
    OutOfBounds,
    AlreadyAtExit,
}

impl MoveOutcome {
    /// Snake_case wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveOutcome::Success => "success",
            MoveOutcome::Wall => "wall",
            MoveOutcome::OutOfBounds => "out_of_bounds",
            MoveOutcome::AlreadyAtExit => "already_at_exit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dimensions_are_odd() {
        assert_eq!(DEFAULT_MAZE_WIDTH % 2, 1);
        assert_eq!(DEFAULT_MAZE_HEIGHT % 2, 1);
        assert!(DEFAULT_MAZE_WIDTH >= MIN_MAZE_DIMENSION);
    }

    #[test]
    fn direction_tokens_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_str(dir.as_str()), Some(dir));
        }
        assert_eq!(Direction::from_str(""), None);
    }

    #[test]
    fn step_saturates_at_zero_instead_of_wrapping() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(origin.step(Direction::Right), Some(Position::new(0, 1)));
    }

    #[test]
    fn maze_size_contains() {
        let size = MazeSize::new(5, 3);
        assert!(size.contains(Position::new(2, 4)));
        assert!(!size.contains(Position::new(3, 0)));
        assert!(!size.contains(Position::new(0, 5)));
    }
}
