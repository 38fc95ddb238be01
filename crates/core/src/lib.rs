//! Core game logic module - pure and testable
//!
//! This module contains the maze topology, the generator and the game state
//! record. It has **no dependencies** on UI, networking, or I/O, making it:
//!
//! - **Testable**: every structural property of a maze can be checked directly
//! - **Portable**: the same grid drives the terminal view, the HTTP API and AI tools
//! - **Reproducible**: a fixed RNG seed yields the same maze
//!
//! # Module Structure
//!
//! - [`grid`]: wall/open occupancy map with closed out-of-bounds queries
//! - [`generator`]: randomized depth-first carving of perfect mazes
//! - [`game_state`]: player/exit positions, move count, completion flag
//! - [`rng`]: seedable LCG used to shuffle carving directions
//! - [`analysis`]: connectivity checks (spanning-tree property, shortest path)
//! - [`error`]: engine error type
//!
//! # Example
//!
//! ```
//! use tui_maze_core::{analysis, MazeGenerator, SimpleRng};
//!
//! let generator = MazeGenerator::new(54, 34);
//! let grid = generator.generate(&mut SimpleRng::new(12345));
//!
//! assert_eq!((grid.width(), grid.height()), (55, 35));
//! assert!(analysis::inspect(&grid).is_perfect());
//! ```

pub mod analysis;
pub mod error;
pub mod game_state;
pub mod generator;
pub mod grid;
pub mod rng;

pub use tui_maze_types as types;

// Re-export commonly used types for convenience
pub use error::{EngineError, Result};
pub use game_state::{exit_anchor, start_anchor, GameState, MoveResult};
pub use generator::MazeGenerator;
pub use grid::{CellKind, Grid};
pub use rng::SimpleRng;
