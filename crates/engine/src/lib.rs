//! Game engine: the authoritative grid and state pair
//!
//! [`GameEngine`] mediates every state transition of a level:
//!
//! ```text
//!            move (lands on exit)
//!   Active ─────────────────────────▶ Completed
//!     ▲                                   │
//!     └──── reset / generate_new_level ───┘
//! ```
//!
//! [`SharedEngine`] wraps one engine in a read/write lock so that the terminal
//! UI, HTTP handlers and AI tool calls can drive it concurrently.
//!
//! ```
//! use tui_maze_engine::GameEngine;
//! use tui_maze_types::{Direction, MoveOutcome};
//!
//! let mut engine = GameEngine::new(Some(7));
//! engine.initialize(5, 5);
//!
//! let result = engine.move_player(Direction::Right).unwrap();
//! assert_eq!(result.outcome, MoveOutcome::Success);
//! assert_eq!(result.state.move_count, 1);
//! ```

pub mod engine;
pub mod shared;

pub use engine::GameEngine;
pub use shared::SharedEngine;
