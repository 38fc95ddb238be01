//! HTTP JSON API
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! {"success": true, "message": "...", "data": {...}}
//! ```
//!
//! | Method | Path | Data |
//! |--------|------|------|
//! | GET | `/api/health` | `{"status":"healthy"}` |
//! | GET | `/api/state` | game state |
//! | GET | `/api/maze` | `{"width","height","rows"}` |
//! | POST | `/api/move` | move result; body `{"direction":"up"}` |
//! | POST | `/api/reset` | game state |
//! | POST | `/api/new-level` | game state |
//!
//! A missing or unknown direction is a 400. Engine errors are a 500.

use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};

pub use axum;

use tui_maze_adapter::{MazeJson, MoveResultJson, StateJson};
use tui_maze_bus::{EventSource, GameController};
use tui_maze_core::EngineError;
use tui_maze_types::{Direction, DEFAULT_HOST, DEFAULT_HTTP_PORT, PORT_RANGE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Consecutive ports tried when `port` is taken.
    pub port_range: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            port_range: PORT_RANGE,
        }
    }
}

/// Response envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn ok(message: &str, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthJson {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Option<String>,
}

/// Error answered with the envelope and `success: false`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Level generation failed: {}", e),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            message: self.message,
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Build the API router. Calls are attributed to [`EventSource::Http`].
pub fn build_router(controller: GameController) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/state", get(api_state))
        .route("/api/maze", get(api_maze))
        .route("/api/move", post(api_move))
        .route("/api/reset", post(api_reset))
        .route("/api/new-level", post(api_new_level))
        .with_state(controller.with_source(EventSource::Http))
        .layer(cors)
}

async fn health() -> Json<ApiResponse<HealthJson>> {
    ApiResponse::ok(
        "Service is healthy",
        HealthJson {
            status: "healthy".to_string(),
        },
    )
}

async fn api_state(State(ctl): State<GameController>) -> ApiResult<StateJson> {
    let state = ctl.current_state()?;
    Ok(ApiResponse::ok("Game state", state.into()))
}

async fn api_maze(State(ctl): State<GameController>) -> ApiResult<MazeJson> {
    let grid = ctl.maze()?;
    Ok(ApiResponse::ok("Maze", MazeJson::from(grid.as_ref())))
}

async fn api_move(
    State(ctl): State<GameController>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> ApiResult<MoveResultJson> {
    let Json(req) = body.map_err(|e| {
        warn!("rejected move request: {}", e.body_text());
        ApiError::bad_request(format!("Invalid request body: {}", e.body_text()))
    })?;
    let raw = req
        .direction
        .ok_or_else(|| ApiError::bad_request("Missing direction parameter"))?;
    let direction = Direction::from_str(&raw).ok_or_else(|| {
        warn!("rejected direction {:?}", raw);
        ApiError::bad_request(format!(
            "Invalid direction: {}. Use one of: up, down, left, right, wait",
            raw
        ))
    })?;

    let result = ctl.move_player(direction)?;
    debug!("http move {} -> {}", direction, result.outcome.as_str());
    Ok(Json(ApiResponse {
        success: result.success,
        message: result.message.to_string(),
        data: Some(result.into()),
    }))
}

async fn api_reset(State(ctl): State<GameController>) -> ApiResult<StateJson> {
    let state = ctl.reset_level()?;
    Ok(ApiResponse::ok("Level reset", state.into()))
}

async fn api_new_level(State(ctl): State<GameController>) -> ApiResult<StateJson> {
    // Generation holds the engine's write lock for the whole carve.
    let state = tokio::task::spawn_blocking(move || ctl.new_level()).await?;
    Ok(ApiResponse::ok("New level generated", state.into()))
}

/// Bind `host:port`, moving up through `port_range` ports while the address is taken.
pub async fn bind_with_fallback(host: &str, port: u16, port_range: u16) -> anyhow::Result<TcpListener> {
    let attempts = if port == 0 { 1 } else { port_range.max(1) };
    let mut last_err = None;
    for offset in 0..attempts {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        let addr = format!("{}:{}", host, candidate);
        match TcpListener::bind(&addr).await {
            Ok(listener) => {
                if offset > 0 {
                    info!("port {} busy, using {}", port, candidate);
                }
                return Ok(listener);
            }
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(e).with_context(|| {
            format!("no free port in {}..{} on {}", port, port.saturating_add(attempts), host)
        }),
        None => anyhow::bail!("no port to try from {} on {}", port, host),
    }
}

/// Run the API until the task is dropped. Sends the bound address on `ready_tx`.
pub async fn serve(
    config: HttpConfig,
    controller: GameController,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = bind_with_fallback(&config.host, config.port, config.port_range).await?;
    let bound = listener.local_addr()?;
    info!("HTTP API listening on http://{}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }
    axum::serve(listener, build_router(controller))
        .await
        .context("HTTP server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tui_maze_bus::EventBus;
    use tui_maze_core::Grid;
    use tui_maze_engine::{GameEngine, SharedEngine};
    use tui_maze_types::Position;

    fn controller() -> GameController {
        let grid = Grid::from_rows(&["#####", "#...#", "#####"]).unwrap();
        let engine =
            GameEngine::with_grid(grid, Position::new(1, 1), Position::new(1, 3)).unwrap();
        GameController::new(SharedEngine::new(engine), EventBus::new(), EventSource::Ui)
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if body.is_some() {
            req = req.header(header::CONTENT_TYPE, "application/json");
        }
        let req = req
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, v) = call(build_router(controller()), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_move_wall_mirrors_success_flag() {
        let (status, v) = call(
            build_router(controller()),
            "POST",
            "/api/move",
            Some(r#"{"direction":"up"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["success"], false);
        assert_eq!(v["message"], "Hit a wall");
        assert_eq!(v["data"]["outcome"], "wall");
        assert_eq!(v["data"]["state"]["move_count"], 0);
    }

    #[tokio::test]
    async fn test_bad_move_requests_are_400() {
        let ctl = controller();
        for body in [None, Some("{}"), Some(r#"{"direction":"north"}"#), Some("nope")] {
            let (status, v) = call(build_router(ctl.clone()), "POST", "/api/move", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
            assert_eq!(v["success"], false);
        }
        assert!(ctl.bus().history().is_empty());
    }

    #[tokio::test]
    async fn test_uninitialized_engine_is_500() {
        let ctl = GameController::new(
            SharedEngine::new(GameEngine::new(Some(1))),
            EventBus::new(),
            EventSource::Ui,
        );
        let (status, v) = call(build_router(ctl), "GET", "/api/state", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(v["message"], "Game not initialized");
    }

    #[tokio::test]
    async fn test_calls_are_published_as_http() {
        let ctl = controller();
        let (status, _) = call(build_router(ctl.clone()), "POST", "/api/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        let history = ctl.bus().history();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.source == EventSource::Http));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_new_level_waits_off_the_runtime_thread() {
        use std::sync::mpsc;
        use std::time::Duration;

        let ctl = controller();
        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let engine = ctl.engine().clone();
        let holder = std::thread::spawn(move || {
            let _guard = engine.write();
            locked_tx.send(()).unwrap();
            let _ = release_rx.recv_timeout(Duration::from_secs(5));
        });
        locked_rx.recv().unwrap();

        let router = build_router(ctl.clone());
        let pending = tokio::spawn(call(router.clone(), "POST", "/api/new-level", None));
        tokio::task::yield_now().await;

        // The single runtime thread still answers while generation waits for the lock.
        let (status, _) = call(router, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!pending.is_finished());

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        let (status, v) = pending.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["message"], "New level generated");
        assert_eq!(ctl.bus().history().len(), 2);
    }

    #[tokio::test]
    async fn test_port_fallback_skips_taken_port() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        match bind_with_fallback("127.0.0.1", port, 5).await {
            Ok(listener) => assert_ne!(listener.local_addr().unwrap().port(), port),
            // Every neighbouring port may be in use on a busy machine.
            Err(e) => assert!(e.to_string().contains("no free port")),
        }
    }
}
