//! Adapter module - AI agent control via TCP socket with JSON protocol
//!
//! This module lets external AI agents play the maze through a small set of
//! named tools. Every tool call goes through the same [`GameController`] path
//! as the terminal UI and the HTTP API, so all front-ends stay in sync.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:8081)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Tool calls**: Client sends `call`, server answers with `result`
//! 4. **Observation Streaming**: Clients that asked for it receive an
//!    `observation` for every game event, whoever caused it
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **call**: Run a tool (`get_game_state`, `move_player`, `reset_level`, `new_level`, `help`)
//! - **list_tools**: Ask for the tool catalog
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello, carries the tool catalog
//! - **result**: Tool outcome with a human-readable summary and the game state
//! - **tools**: Tool catalog
//! - **observation**: Game event with the resulting state
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `MAZE_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `MAZE_AI_PORT`: Port number (default: 8081)
//! - `MAZE_AI_DISABLED`: Set to "1" or "true" to disable the server entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":0,"client":{"name":"my-ai","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"game_id":"tui-maze","tools":[...]}
//! Client -> Server: {"type":"call","seq":2,"ts":0,"tool":"move_player","args":{"direction":"right"}}
//! Server -> Client: {"type":"result","seq":2,"ts":...,"tool":"move_player","ok":true,"text":"Move successful!\n...","state":{...}}
//! Server -> Client: {"type":"observation","seq":1,"ts":...,"event":"player_moved","source":"agent","state":{...}}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 8081
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"test","version":"1.0.0"},"protocol_version":"1.0.0"}
//! ```

pub mod json;
pub mod protocol;
pub mod server;
pub mod tools;

pub use tui_maze_bus as bus;
pub use tui_maze_core as core;
pub use tui_maze_engine as engine;
pub use tui_maze_types as types;

pub use bus::GameController;
pub use json::{MazeJson, MoveResultJson, PositionJson, SizeJson, StateJson};
pub use protocol::*;
pub use server::{run_server, AdapterStatus, ServerConfig};
pub use tools::{call_tool, catalog, Tool, ToolOutput};
