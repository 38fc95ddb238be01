//! TUI Maze (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_maze::{adapter,bus,core,engine,http,input,term,types}`
//! and holds the pieces the binary composes: the log backend and the server runtime.

pub mod logging;
pub mod runtime;

pub use tui_maze_adapter as adapter;
pub use tui_maze_bus as bus;
pub use tui_maze_core as core;
pub use tui_maze_engine as engine;
pub use tui_maze_http as http;
pub use tui_maze_input as input;
pub use tui_maze_term as term;
pub use tui_maze_types as types;
