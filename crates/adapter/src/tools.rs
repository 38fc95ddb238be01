//! Agent tools: dispatch by name and render human-readable summaries.

use log::{debug, warn};

use crate::bus::GameController;
use crate::core::{EngineError, GameState, MoveResult};
use crate::protocol::{ErrorCode, ToolInfo};
use crate::types::{Direction, MoveOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    GetGameState,
    MovePlayer,
    ResetLevel,
    NewLevel,
    Help,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::GetGameState,
        Tool::MovePlayer,
        Tool::ResetLevel,
        Tool::NewLevel,
        Tool::Help,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::GetGameState => "get_game_state",
            Tool::MovePlayer => "move_player",
            Tool::ResetLevel => "reset_level",
            Tool::NewLevel => "new_level",
            Tool::Help => "help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::GetGameState => "Get the current game state",
            Tool::MovePlayer => "Move the player one cell (up, down, left, right, wait)",
            Tool::ResetLevel => "Reset the current level and put the player back at the start",
            Tool::NewLevel => "Generate a brand new maze",
            Tool::Help => "List the available tools",
        }
    }

    pub fn params(&self) -> &'static [&'static str] {
        match self {
            Tool::MovePlayer => &["direction"],
            _ => &[],
        }
    }

    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
            params: self.params().iter().map(|p| p.to_string()).collect(),
        }
    }
}

pub fn catalog() -> Vec<ToolInfo> {
    Tool::ALL.iter().map(Tool::info).collect()
}

/// What a tool call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// False when the game refused the request.
    pub ok: bool,
    pub text: String,
    pub state: Option<GameState>,
}

/// Failure to run a tool, mapped straight onto a protocol error.
pub type ToolError = (ErrorCode, String);

/// Run `tool` against the game.
pub fn call_tool(
    controller: &GameController,
    tool: &str,
    args: &serde_json::Value,
) -> Result<ToolOutput, ToolError> {
    let Some(kind) = Tool::from_name(tool) else {
        return Err((ErrorCode::UnknownTool, format!("Unknown tool: {}", tool)));
    };
    debug!("tool call {}", tool);

    match kind {
        Tool::GetGameState => {
            let state = controller.current_state().map_err(engine_error)?;
            Ok(ToolOutput {
                ok: true,
                text: state_summary(&state),
                state: Some(state),
            })
        }
        Tool::MovePlayer => {
            let direction = parse_direction(args)?;
            let result = controller.move_player(direction).map_err(engine_error)?;
            Ok(ToolOutput {
                ok: result.success,
                text: move_summary(&result),
                state: Some(result.state),
            })
        }
        Tool::ResetLevel => {
            let state = controller.reset_level().map_err(engine_error)?;
            Ok(ToolOutput {
                ok: true,
                text: reset_summary(&state),
                state: Some(state),
            })
        }
        Tool::NewLevel => {
            let state = controller.new_level();
            Ok(ToolOutput {
                ok: true,
                text: new_level_summary(&state),
                state: Some(state),
            })
        }
        Tool::Help => Ok(ToolOutput {
            ok: true,
            text: help_text(),
            state: None,
        }),
    }
}

fn parse_direction(args: &serde_json::Value) -> Result<Direction, ToolError> {
    let raw = args
        .get("direction")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| {
            (
                ErrorCode::InvalidArgument,
                "Missing string argument: direction".to_string(),
            )
        })?;
    Direction::from_str(raw).ok_or_else(|| {
        warn!("rejected direction {:?}", raw);
        (
            ErrorCode::InvalidArgument,
            format!(
                "Invalid direction: {}. Use one of: up, down, left, right, wait",
                raw
            ),
        )
    })
}

fn engine_error(e: EngineError) -> ToolError {
    (ErrorCode::InternalError, e.to_string())
}

pub fn state_summary(state: &GameState) -> String {
    let footer = if state.is_completed {
        "The player has reached the exit!"
    } else {
        "Keep exploring the maze..."
    };
    format!(
        "Current game state:\n\
         - Maze size: {} x {}\n\
         - Player: col {}, row {}\n\
         - Exit: col {}, row {}\n\
         - Moves: {}\n\
         - Status: {}\n\n{}",
        state.maze_size.width,
        state.maze_size.height,
        state.player_position.col,
        state.player_position.row,
        state.exit_position.col,
        state.exit_position.row,
        state.move_count,
        state.status_label(),
        footer
    )
}

pub fn move_summary(result: &MoveResult) -> String {
    let state = &result.state;
    match result.outcome {
        MoveOutcome::AlreadyAtExit => "The player is already at the exit; nothing to do.".to_string(),
        MoveOutcome::Wall => "Move failed: hit a wall!".to_string(),
        MoveOutcome::OutOfBounds => "Move failed: outside the maze!".to_string(),
        MoveOutcome::Success if result.message == "Wait action" => format!(
            "Waited one turn.\n- Position: col {}, row {}\n- Moves: {}",
            state.player_position.col, state.player_position.row, state.move_count
        ),
        MoveOutcome::Success if state.is_completed => format!(
            "Move successful! The player reached the exit!\n\
             - New position: col {}, row {}\n\
             - Total moves: {}\n\
             - Maze completed!",
            state.player_position.col, state.player_position.row, state.move_count
        ),
        MoveOutcome::Success => format!(
            "Move successful!\n\
             - New position: col {}, row {}\n\
             - Total moves: {}\n\
             - Status: playing",
            state.player_position.col, state.player_position.row, state.move_count
        ),
    }
}

pub fn reset_summary(state: &GameState) -> String {
    format!(
        "Maze reset!\n\
         - Player back at start: col {}, row {}\n\
         - Moves: 0\n\
         - Status: playing\n\nExplore the maze again!",
        state.player_position.col, state.player_position.row
    )
}

pub fn new_level_summary(state: &GameState) -> String {
    format!(
        "New maze generated!\n\
         - Start: col {}, row {}\n\
         - Exit: col {}, row {}\n\
         - Moves: 0\n\
         - Status: playing\n\nGood luck!",
        state.player_position.col,
        state.player_position.row,
        state.exit_position.col,
        state.exit_position.row
    )
}

pub fn help_text() -> String {
    let mut out = String::from("Available tools:\n");
    for (i, tool) in Tool::ALL.iter().enumerate() {
        let params = tool.params().join(", ");
        out.push_str(&format!(
            "{}. {}({}) - {}\n",
            i + 1,
            tool.name(),
            params,
            tool.description()
        ));
    }
    out.push_str("\nExample: move_player {\"direction\": \"up\"}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{EventBus, EventSource};
    use crate::core::Grid;
    use crate::engine::{GameEngine, SharedEngine};
    use crate::types::Position;
    use serde_json::json;

    fn controller() -> GameController {
        let grid = Grid::from_rows(&["#####", "#...#", "#####"]).unwrap();
        let engine =
            GameEngine::with_grid(grid, Position::new(1, 1), Position::new(1, 3)).unwrap();
        GameController::new(
            SharedEngine::new(engine),
            EventBus::new(),
            EventSource::Agent,
        )
    }

    #[test]
    fn test_tool_names_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name("fly"), None);
        assert_eq!(catalog().len(), 5);
    }

    #[test]
    fn test_unknown_tool() {
        let err = call_tool(&controller(), "teleport", &json!({})).unwrap_err();
        assert_eq!(err.0, ErrorCode::UnknownTool);
    }

    #[test]
    fn test_move_player_arguments() {
        let ctl = controller();
        let err = call_tool(&ctl, "move_player", &serde_json::Value::Null).unwrap_err();
        assert_eq!(err.0, ErrorCode::InvalidArgument);
        let err = call_tool(&ctl, "move_player", &json!({"direction": "north"})).unwrap_err();
        assert_eq!(err.0, ErrorCode::InvalidArgument);
        assert!(ctl.bus().history().is_empty());

        let out = call_tool(&ctl, "move_player", &json!({"direction": "RIGHT"})).unwrap();
        assert!(out.ok);
        assert!(out.text.starts_with("Move successful!"));
        assert_eq!(out.state.unwrap().move_count, 1);
    }

    #[test]
    fn test_move_summaries() {
        let ctl = controller();
        let out = call_tool(&ctl, "move_player", &json!({"direction": "up"})).unwrap();
        assert!(!out.ok);
        assert_eq!(out.text, "Move failed: hit a wall!");

        call_tool(&ctl, "move_player", &json!({"direction": "right"})).unwrap();
        let out = call_tool(&ctl, "move_player", &json!({"direction": "right"})).unwrap();
        assert!(out.text.contains("reached the exit"));

        let out = call_tool(&ctl, "move_player", &json!({"direction": "left"})).unwrap();
        assert!(out.ok);
        assert!(out.text.contains("already at the exit"));
    }

    #[test]
    fn test_state_reset_and_help() {
        let ctl = controller();
        let out = call_tool(&ctl, "get_game_state", &json!({})).unwrap();
        assert!(out.text.contains("Maze size: 5 x 3"));
        assert!(out.text.contains("Status: Playing"));

        let out = call_tool(&ctl, "reset_level", &json!({})).unwrap();
        assert!(out.text.starts_with("Maze reset!"));

        let out = call_tool(&ctl, "help", &json!({})).unwrap();
        assert!(out.state.is_none());
        assert!(out.text.contains("2. move_player(direction)"));
    }
}
