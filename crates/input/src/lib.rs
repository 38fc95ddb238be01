//! Terminal input module.
//!
//! Maps `crossterm` key events into [`UiCommand`]s. Each key press is one turn;
//! there is no key repeat handling beyond what the terminal itself sends.

pub mod map;

pub use tui_maze_types as types;

pub use map::{handle_key_event, should_quit, UiCommand};
