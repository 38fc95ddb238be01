//! Game state module - the player-facing record of a level
//!
//! `GameState` is plain `Copy` data. Every value handed out by the engine is
//! therefore an independent snapshot: mutating it cannot reach back into the
//! engine.

use crate::types::{MazeSize, MoveOutcome, Position};

/// Start anchor: left border, second row from the bottom.
pub fn start_anchor(size: MazeSize) -> Position {
    Position::new(size.height - 2, 0)
}

/// Exit anchor: right border, second row from the top.
pub fn exit_anchor(size: MazeSize) -> Position {
    Position::new(1, size.width - 1)
}

/// Complete game state of the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    pub maze_size: MazeSize,
    pub player_position: Position,
    pub exit_position: Position,
    pub move_count: u32,
    /// Set when a move lands on the exit; only reset/new level clear it.
    pub is_completed: bool,
}

impl GameState {
    /// Fresh state with the player standing on `start`.
    pub fn new(maze_size: MazeSize, start: Position, exit: Position) -> Self {
        Self {
            maze_size,
            player_position: start,
            exit_position: exit,
            move_count: 0,
            is_completed: start == exit,
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_completed {
            "Completed"
        } else {
            "Playing"
        }
    }
}

/// Outcome of a single move attempt together with the resulting snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub success: bool,
    pub outcome: MoveOutcome,
    pub state: GameState,
    pub message: &'static str,
}

impl MoveResult {
    pub fn new(outcome: MoveOutcome, state: GameState) -> Self {
        let (success, message) = match outcome {
            MoveOutcome::Success => (true, "Move successful"),
            MoveOutcome::AlreadyAtExit => (true, "Already at exit"),
            MoveOutcome::Wall => (false, "Hit a wall"),
            MoveOutcome::OutOfBounds => (false, "Move out of bounds"),
        };
        Self {
            success,
            outcome,
            state,
            message,
        }
    }

    /// A successful turn that did not move the player.
    pub fn waited(state: GameState) -> Self {
        Self {
            message: "Wait action",
            ..Self::new(MoveOutcome::Success, state)
        }
    }
}
