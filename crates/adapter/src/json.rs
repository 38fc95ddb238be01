//! Stable JSON encoding of engine values.
//!
//! Shared by the tool protocol and the HTTP API so both expose the same shape:
//!
//! ```json
//! {"maze_size":{"width":55,"height":35},"player_position":{"row":33,"col":0},
//!  "exit_position":{"row":1,"col":54},"move_count":0,"is_completed":false}
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Grid, MoveResult};
use crate::types::{MazeSize, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeJson {
    pub width: usize,
    pub height: usize,
}

impl From<MazeSize> for SizeJson {
    fn from(size: MazeSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionJson {
    pub row: usize,
    pub col: usize,
}

impl From<Position> for PositionJson {
    fn from(pos: Position) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateJson {
    pub maze_size: SizeJson,
    pub player_position: PositionJson,
    pub exit_position: PositionJson,
    pub move_count: u32,
    pub is_completed: bool,
}

impl From<GameState> for StateJson {
    fn from(gs: GameState) -> Self {
        Self {
            maze_size: gs.maze_size.into(),
            player_position: gs.player_position.into(),
            exit_position: gs.exit_position.into(),
            move_count: gs.move_count,
            is_completed: gs.is_completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResultJson {
    pub success: bool,
    /// `success`, `wall`, `out_of_bounds` or `already_at_exit`
    pub outcome: String,
    pub state: StateJson,
    pub message: String,
}

impl From<MoveResult> for MoveResultJson {
    fn from(r: MoveResult) -> Self {
        Self {
            success: r.success,
            outcome: r.outcome.as_str().to_string(),
            state: r.state.into(),
            message: r.message.to_string(),
        }
    }
}

/// Text rows of the maze, `#` for walls and `.` for open cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeJson {
    pub width: usize,
    pub height: usize,
    pub rows: Vec<String>,
}

impl From<&Grid> for MazeJson {
    fn from(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            rows: grid.to_rows(),
        }
    }
}
