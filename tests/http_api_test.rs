use std::time::Duration;

use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tower::ServiceExt;

use tui_maze::adapter::{MazeJson, MoveResultJson, StateJson};
use tui_maze::bus::{EventBus, EventKind, EventSource, GameController};
use tui_maze::engine::{GameEngine, SharedEngine};
use tui_maze::http::axum::body::Body;
use tui_maze::http::axum::http::{Request, StatusCode};
use tui_maze::http::{build_router, serve, ApiResponse, HttpConfig};

fn controller() -> GameController {
    let mut engine = GameEngine::new(Some(42));
    engine.initialize(9, 7);
    GameController::new(SharedEngine::new(engine), EventBus::new(), EventSource::Ui)
}

async fn request<T: DeserializeOwned>(
    ctl: &GameController,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, ApiResponse<T>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let resp = build_router(ctl.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn state_and_maze_describe_the_same_level() {
    let ctl = controller();
    let (status, state) = request::<StateJson>(&ctl, "GET", "/api/state", None).await;
    assert_eq!(status, StatusCode::OK);
    let state = state.data.unwrap();
    assert_eq!((state.maze_size.width, state.maze_size.height), (9, 7));
    assert_eq!((state.player_position.row, state.player_position.col), (5, 0));
    assert_eq!((state.exit_position.row, state.exit_position.col), (1, 8));
    assert_eq!(state.move_count, 0);
    assert!(!state.is_completed);

    let (status, maze) = request::<MazeJson>(&ctl, "GET", "/api/maze", None).await;
    assert_eq!(status, StatusCode::OK);
    let maze = maze.data.unwrap();
    assert_eq!(maze.rows.len(), 7);
    assert!(maze.rows.iter().all(|r| r.len() == 9));
    assert_eq!(maze.rows[5].as_bytes()[0], b'.');
    assert_eq!(maze.rows[1].as_bytes()[8], b'.');
}

#[tokio::test]
async fn move_reset_and_new_level() {
    let ctl = controller();

    let (status, moved) =
        request::<MoveResultJson>(&ctl, "POST", "/api/move", Some(r#"{"direction":"right"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(moved.success);
    assert_eq!(moved.message, "Move successful");
    let data = moved.data.unwrap();
    assert_eq!(data.outcome, "success");
    assert_eq!(data.state.move_count, 1);

    let (_, oob) =
        request::<MoveResultJson>(&ctl, "POST", "/api/move", Some(r#"{"direction":"down"}"#)).await;
    let oob_data = oob.data.unwrap();
    assert!(!oob.success);
    assert!(matches!(oob_data.outcome.as_str(), "wall" | "out_of_bounds"));
    assert_eq!(oob_data.state.move_count, 1);

    let (status, reset) = request::<StateJson>(&ctl, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reset.data.unwrap().move_count, 0);

    let (status, fresh) = request::<StateJson>(&ctl, "POST", "/api/new-level", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fresh.message, "New level generated");
    assert_eq!(fresh.data.unwrap().move_count, 0);

    let sources: Vec<EventSource> = ctl.bus().history().iter().map(|e| e.source).collect();
    assert!(sources.iter().all(|&s| s == EventSource::Http));
    let kinds: Vec<EventKind> = ctl.bus().history().iter().map(|e| e.kind).collect();
    assert_eq!(kinds.iter().filter(|k| **k == EventKind::GameStateUpdated).count(), 4);
    assert!(kinds.contains(&EventKind::NewLevelGenerated));
}

#[tokio::test]
async fn bad_move_requests_are_400() {
    let ctl = controller();
    for body in [r#"{"direction":"north"}"#, r#"{}"#, "not json"] {
        let (status, resp) = request::<()>(&ctl, "POST", "/api/move", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert!(!resp.success);
        assert!(resp.data.is_none());
    }
    assert_eq!(ctl.current_state().unwrap().move_count, 0);
    assert!(ctl.bus().history().is_empty());
}

#[tokio::test]
async fn serves_over_tcp() {
    let (ready_tx, ready_rx) = oneshot::channel();
    let config = HttpConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        port_range: 1,
    };
    let server = tokio::spawn(serve(config, controller(), Some(ready_tx)));
    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .unwrap()
        .unwrap();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    tokio::time::timeout(Duration::from_secs(2), stream.read_to_string(&mut raw))
        .await
        .unwrap()
        .unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"));
    assert!(raw.contains(r#""status":"healthy""#));

    server.abort();
}
