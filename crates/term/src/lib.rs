//! Terminal maze renderer.
//!
//! Renders into a plain framebuffer instead of a widget toolkit, then flushes
//! it to the terminal as a diff against the previous frame.
//!
//! - `fb`: styled cell buffer
//! - `maze_view`: grid, player, exit and side panel into a framebuffer
//! - `renderer`: crossterm output with run-length diffing

pub mod fb;
pub mod maze_view;
pub mod renderer;

pub use tui_maze_core as core;
pub use tui_maze_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use maze_view::{AiStatusView, MazeView, StatusView, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, Run, TerminalRenderer};
