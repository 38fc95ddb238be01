//! Protocol module - JSON message types for the AI tool server
//!
//! Line-delimited JSON. All messages have: type, seq (sequence number),
//! ts (timestamp in ms).

use serde::{Deserialize, Serialize};

use crate::json::StateJson;

/// Message timestamps share the event bus clock.
pub use crate::bus::current_timestamp_ms;

/// Protocol version spoken by this server. Clients must share the major version.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Identifier reported in `welcome`
pub const GAME_ID: &str = "tui-maze";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CallType {
    #[default]
    #[serde(rename = "call")]
    Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ListToolsType {
    #[default]
    #[serde(rename = "list_tools")]
    ListTools,
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    /// Receive an `observation` for every game event.
    #[serde(default)]
    pub stream_observations: bool,
}

/// Tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CallType,
    pub seq: u64,
    pub ts: u64,
    pub tool: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ListToolsType,
    pub seq: u64,
    pub ts: u64,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "result")]
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolsType {
    #[serde(rename = "tools")]
    Tools,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "unknown_tool")]
    UnknownTool,
    #[serde(rename = "invalid_argument")]
    InvalidArgument,
    #[serde(rename = "internal_error")]
    InternalError,
}

/// Tool description advertised to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub game_id: String,
    pub tools: Vec<ToolInfo>,
}

/// Outcome of a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(rename = "type")]
    pub msg_type: ResultType,
    pub seq: u64,
    pub ts: u64,
    pub tool: String,
    /// False when the game refused the request (e.g. a move into a wall).
    pub ok: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsMessage {
    #[serde(rename = "type")]
    pub msg_type: ToolsType,
    pub seq: u64,
    pub ts: u64,
    pub tools: Vec<ToolInfo>,
}

/// Game event pushed to streaming clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub event: String,
    pub source: String,
    pub state: StateJson,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Call(CallMessage),
    ListTools(ListToolsMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

/// Parse a JSON message from a string
///
/// A well-formed object with an unrecognized `type` is returned as
/// [`ParsedMessage::Unknown`] rather than an error.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "call")]
        Call(CallMessage),
        #[serde(rename = "list_tools")]
        ListTools(ListToolsMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Call(m)) => Ok(ParsedMessage::Call(m)),
        Ok(InboundMessage::ListTools(m)) => Ok(ParsedMessage::ListTools(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Header {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            let msg_type = header.msg_type.unwrap_or_else(|| "unknown".to_string());
            if matches!(msg_type.as_str(), "hello" | "call" | "list_tools") {
                return Err(e);
            }
            Ok(ParsedMessage::Unknown(UnknownMessage {
                seq: header.seq.unwrap_or(0),
                msg_type,
            }))
        }
    }
}

/// Best-effort `seq` of a line that failed to parse.
pub fn extract_seq(json: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .and_then(|v| v.get("seq").and_then(serde_json::Value::as_u64))
        .unwrap_or(0)
}

/// Whether a client's protocol version shares our major version.
pub fn is_compatible_version(version: &str) -> bool {
    let major = |v: &str| v.split('.').next().map(str::to_string);
    major(version.trim()) == major(PROTOCOL_VERSION)
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, stream_observations: bool) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
        requested: RequestedCapabilities {
            stream_observations,
        },
    }
}

/// Create a tool call message
pub fn create_call(seq: u64, tool: &str, args: serde_json::Value) -> CallMessage {
    CallMessage {
        msg_type: CallType::Call,
        seq,
        ts: current_timestamp_ms(),
        tool: tool.to_string(),
        args,
    }
}

/// Create a welcome message
pub fn create_welcome(seq: u64, client_id: u64, tools: Vec<ToolInfo>) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id,
        game_id: GAME_ID.to_string(),
        tools,
    }
}

pub fn create_result(
    seq: u64,
    tool: &str,
    ok: bool,
    text: String,
    state: Option<StateJson>,
) -> ResultMessage {
    ResultMessage {
        msg_type: ResultType::Result,
        seq,
        ts: current_timestamp_ms(),
        tool: tool.to_string(),
        ok,
        text,
        state,
    }
}

pub fn create_tools(seq: u64, tools: Vec<ToolInfo>) -> ToolsMessage {
    ToolsMessage {
        msg_type: ToolsType::Tools,
        seq,
        ts: current_timestamp_ms(),
        tools,
    }
}

pub fn create_observation(seq: u64, event: &str, source: &str, state: StateJson) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        event: event.to_string(),
        source: source.to_string(),
        state,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"test-ai","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.msg_type, HelloType::Hello);
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "test-ai");
                assert!(msg.requested.stream_observations);
            }
            other => panic!("Expected Hello message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_hello_without_requested() {
        let json = r#"{"type":"hello","seq":1,"ts":0,"client":{"name":"a","version":"0"},"protocol_version":"1.2.0"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => assert!(!msg.requested.stream_observations),
            other => panic!("Expected Hello message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_call() {
        let json = r#"{"type":"call","seq":2,"ts":1,"tool":"move_player","args":{"direction":"up"}}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Call(msg) => {
                assert_eq!(msg.tool, "move_player");
                assert_eq!(msg.args["direction"], "up");
            }
            other => panic!("Expected Call message, got {:?}", other),
        }

        let json = r#"{"type":"call","seq":3,"ts":1,"tool":"get_game_state"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Call(msg) => assert!(msg.args.is_null()),
            other => panic!("Expected Call message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_and_malformed() {
        match parse_message(r#"{"type":"dance","seq":9,"ts":0}"#).unwrap() {
            ParsedMessage::Unknown(u) => {
                assert_eq!(u.seq, 9);
                assert_eq!(u.msg_type, "dance");
            }
            other => panic!("Expected Unknown message, got {:?}", other),
        }
        assert!(parse_message("not json").is_err());
        // Known type with missing fields is a parse error.
        assert!(parse_message(r#"{"type":"call","seq":4}"#).is_err());
        assert_eq!(extract_seq(r#"{"type":"call","seq":4}"#), 4);
        assert_eq!(extract_seq("garbage"), 0);
    }

    #[test]
    fn test_version_compatibility() {
        assert!(is_compatible_version("1.0.0"));
        assert!(is_compatible_version("1.7"));
        assert!(!is_compatible_version("2.0.0"));
        assert!(!is_compatible_version(""));
    }

    #[test]
    fn test_error_code_wire_names() {
        let err = create_error(5, ErrorCode::UnknownTool, "no such tool");
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(v["code"], "unknown_tool");
        assert_eq!(v["seq"], 5);
    }

    #[test]
    fn test_result_omits_missing_state() {
        let msg = create_result(3, "help", true, "tools".to_string(), None);
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "result");
        assert!(v.get("state").is_none());
    }

    #[test]
    fn test_timestamps_follow_bus_clock() {
        let before = crate::bus::current_timestamp_ms();
        let err = create_error(1, ErrorCode::InternalError, "boom");
        let after = crate::bus::current_timestamp_ms();
        assert!(before <= err.ts && err.ts <= after);
        assert!(current_timestamp_ms() >= after);
    }
}
