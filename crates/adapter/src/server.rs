//! TCP server for AI agents
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::bus::{EventSource, GameController, GameEvent};
use crate::json::StateJson;
use crate::protocol::*;
use crate::tools::{call_tool, catalog};
use crate::types::{DEFAULT_AI_PORT, DEFAULT_HOST};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_AI_PORT,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("MAZE_AI_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = env::var("MAZE_AI_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_AI_PORT);

        Self { host, port }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid AI server address {}:{}", self.host, self.port))
    }

    /// Check if the AI server is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("MAZE_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// Live client counters, shared with the terminal UI.
#[derive(Debug, Default)]
pub struct AdapterStatus {
    connected: AtomicUsize,
    streaming: AtomicUsize,
}

impl AdapterStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected(&self) -> usize {
        self.connected.load(Ordering::Relaxed)
    }

    pub fn streaming(&self) -> usize {
        self.streaming.load(Ordering::Relaxed)
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: u64,
    stream_observations: bool,
    handshaken: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
enum ClientOutbound {
    Welcome(WelcomeMessage),
    Result(ResultMessage),
    Tools(ToolsMessage),
    Observation(ObservationMessage),
    Error(ErrorMessage),
}

impl ClientOutbound {
    fn encode_into(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            ClientOutbound::Welcome(m) => serde_json::to_writer(&mut *buf, m),
            ClientOutbound::Result(m) => serde_json::to_writer(&mut *buf, m),
            ClientOutbound::Tools(m) => serde_json::to_writer(&mut *buf, m),
            ClientOutbound::Observation(m) => serde_json::to_writer(&mut *buf, m),
            ClientOutbound::Error(m) => serde_json::to_writer(&mut *buf, m),
        }
    }
}

/// Shared server state
struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
    status: Arc<AdapterStatus>,
    controller: GameController,
    observation_seq: AtomicU64,
}

impl ServerState {
    async fn is_handshaken(&self, client_id: u64) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    /// Enforce strictly increasing `seq` per client.
    async fn check_and_update_seq(&self, client_id: u64, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn broadcast_event(&self, event: &GameEvent) {
        let clients = self.clients.read().await;
        let mut obs = None;
        for c in clients.iter().filter(|c| c.stream_observations) {
            let msg = obs.get_or_insert_with(|| {
                create_observation(
                    self.observation_seq.fetch_add(1, Ordering::Relaxed) + 1,
                    event.kind.as_str(),
                    event.source.as_str(),
                    StateJson::from(event.state),
                )
            });
            let _ = c.tx.send(ClientOutbound::Observation(msg.clone()));
        }
    }
}

/// Start the TCP server
///
/// Tool calls are attributed to [`EventSource::Agent`]. Sends the bound address
/// on `ready_tx` once listening (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    controller: GameController,
    status: Arc<AdapterStatus>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind AI server on {}", addr))?;
    let bound = listener.local_addr()?;
    info!("AI tool server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut events = controller.bus().subscribe();
    let state = Arc::new(ServerState {
        clients: RwLock::new(Vec::new()),
        status,
        controller: controller.with_source(EventSource::Agent),
        observation_seq: AtomicU64::new(0),
    });

    // Observation dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => state.broadcast_event(&event).await,
                    Err(RecvError::Lagged(n)) => warn!("observation stream lagged by {} events", n),
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    let mut client_id_counter = 0u64;

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!("agent {} connected from {}", client_id, addr);

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, state).await {
                warn!("agent {} error: {}", client_id, e);
            }
            info!("agent {} disconnected", client_id);
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: u64,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    // Channel to send messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }
    state.status.connected.fetch_add(1, Ordering::Relaxed);

    // Spawn task to write messages to client
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if msg.encode_into(&mut buf).is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let result = read_loop(&mut reader, client_id, &state, &tx).await;

    // Clean up: remove client.
    {
        let mut clients = state.clients.write().await;
        if let Some(pos) = clients.iter().position(|c| c.id == client_id) {
            let client = clients.remove(pos);
            if client.stream_observations {
                state.status.streaming.fetch_sub(1, Ordering::Relaxed);
            }
        }
    }
    state.status.connected.fetch_sub(1, Ordering::Relaxed);

    // Flush what is queued, then stop the writer.
    drop(tx);
    let _ = write_task.await;

    result
}

async fn read_loop<R>(
    reader: &mut BufReader<R>,
    client_id: u64,
    state: &ServerState,
    tx: &mpsc::UnboundedSender<ClientOutbound>,
) -> anyhow::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let send_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            // Client disconnected
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let handshaken = state.is_handshaken(client_id).await;
        let parsed = match parse_message(trimmed) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("agent {} sent malformed line: {}", client_id, e);
                send_error(
                    extract_seq(trimmed),
                    ErrorCode::InvalidCommand,
                    &format!("JSON parse error: {}", e),
                );
                continue;
            }
        };

        let seq = match &parsed {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Call(m) => m.seq,
            ParsedMessage::ListTools(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        };

        let is_hello = matches!(parsed, ParsedMessage::Hello(_));
        if !handshaken && !is_hello {
            send_error(seq, ErrorCode::HandshakeRequired, "Send hello first");
            continue;
        }
        if handshaken && !state.check_and_update_seq(client_id, seq).await {
            send_error(seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
            continue;
        }

        match parsed {
            ParsedMessage::Hello(hello) => {
                if !is_compatible_version(&hello.protocol_version) {
                    send_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    return Ok(());
                }

                let streaming = hello.requested.stream_observations;
                {
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        if streaming != client.stream_observations {
                            if streaming {
                                state.status.streaming.fetch_add(1, Ordering::Relaxed);
                            } else {
                                state.status.streaming.fetch_sub(1, Ordering::Relaxed);
                            }
                        }
                        client.stream_observations = streaming;
                    }
                }
                info!(
                    "agent {} is {} v{} (streaming: {})",
                    client_id, hello.client.name, hello.client.version, streaming
                );

                let welcome = create_welcome(hello.seq, client_id, catalog());
                let _ = tx.send(ClientOutbound::Welcome(welcome));
            }

            ParsedMessage::ListTools(msg) => {
                let _ = tx.send(ClientOutbound::Tools(create_tools(msg.seq, catalog())));
            }

            ParsedMessage::Call(call) => {
                // Tools take the engine's blocking lock and may generate a maze.
                let controller = state.controller.clone();
                let (tool, args) = (call.tool.clone(), call.args.clone());
                let outcome =
                    tokio::task::spawn_blocking(move || call_tool(&controller, &tool, &args))
                        .await
                        .unwrap_or_else(|e| {
                            Err((ErrorCode::InternalError, format!("Tool task failed: {}", e)))
                        });
                match outcome {
                    Ok(out) => {
                        debug!("agent {} {} -> ok={}", client_id, call.tool, out.ok);
                        let result = create_result(
                            call.seq,
                            &call.tool,
                            out.ok,
                            out.text,
                            out.state.map(StateJson::from),
                        );
                        let _ = tx.send(ClientOutbound::Result(result));
                    }
                    Err((code, message)) => {
                        warn!("agent {} {} rejected: {}", client_id, call.tool, message);
                        send_error(call.seq, code, &message);
                    }
                }
            }

            ParsedMessage::Unknown(msg) => {
                send_error(
                    msg.seq,
                    ErrorCode::InvalidCommand,
                    &format!("Unknown message type: {}", msg.msg_type),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:8081".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_bad_host_is_an_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_status_starts_empty() {
        let status = AdapterStatus::new();
        assert_eq!(status.connected(), 0);
        assert_eq!(status.streaming(), 0);
    }
}
