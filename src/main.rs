//! Terminal maze runner (default binary).
//!
//! Composition root: parses the CLI, installs logging, builds the engine, bus
//! and controller, starts the HTTP and AI servers, then runs the terminal
//! loop (or just the servers with `--headless`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};
use tokio::sync::broadcast::error::TryRecvError;

use tui_maze::adapter::ServerConfig;
use tui_maze::bus::{EventBus, EventKind, EventSource, GameController};
use tui_maze::engine::{GameEngine, SharedEngine};
use tui_maze::http::HttpConfig;
use tui_maze::input::{handle_key_event, should_quit, UiCommand};
use tui_maze::logging::{self, LogSink};
use tui_maze::runtime::{ServiceConfig, Services};
use tui_maze::term::{FrameBuffer, MazeView, TerminalRenderer, Viewport};
use tui_maze::types::{
    DEFAULT_AI_PORT, DEFAULT_HOST, DEFAULT_HTTP_PORT, DEFAULT_MAZE_HEIGHT, DEFAULT_MAZE_WIDTH,
    PORT_RANGE, TICK_MS,
};

/// Maze game for the terminal, an HTTP API and AI agents.
#[derive(Debug, Parser)]
#[command(name = "tui-maze", version, about)]
struct Cli {
    /// Maze width in cells (rounded up to odd, minimum 3)
    #[arg(long, env = "MAZE_WIDTH", default_value_t = DEFAULT_MAZE_WIDTH)]
    maze_width: usize,

    /// Maze height in cells (rounded up to odd, minimum 3)
    #[arg(long, env = "MAZE_HEIGHT", default_value_t = DEFAULT_MAZE_HEIGHT)]
    maze_height: usize,

    /// RNG seed; the clock is used when absent
    #[arg(long, env = "MAZE_SEED")]
    seed: Option<u32>,

    /// HTTP API bind host
    #[arg(long, env = "MAZE_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// HTTP API port (the next free port is used when taken)
    #[arg(long, env = "MAZE_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// AI tool server bind host
    #[arg(long, env = "MAZE_AI_HOST", default_value = DEFAULT_HOST)]
    ai_host: String,

    /// AI tool server port
    #[arg(long, env = "MAZE_AI_PORT", default_value_t = DEFAULT_AI_PORT)]
    ai_port: u16,

    /// Do not start the AI tool server
    #[arg(long, env = "MAZE_AI_DISABLED", value_parser = clap::builder::FalseyValueParser::new())]
    no_ai: bool,

    /// Run the servers only, without the terminal UI
    #[arg(long, env = "MAZE_HEADLESS", value_parser = clap::builder::FalseyValueParser::new())]
    headless: bool,

    /// Append log lines to this file
    #[arg(long, env = "MAZE_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, env = "MAZE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn service_config(&self) -> ServiceConfig {
        let ai_disabled = self.no_ai || ServerConfig::is_disabled();
        ServiceConfig {
            http: HttpConfig {
                host: self.host.clone(),
                port: self.port,
                port_range: PORT_RANGE,
            },
            ai: (!ai_disabled).then(|| ServerConfig {
                host: self.ai_host.clone(),
                port: self.ai_port,
            }),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(
        logging::parse_level(&cli.log_level)?,
        LogSink::open(cli.log_file.as_deref(), cli.headless)?,
    )?;

    let mut engine = GameEngine::new(cli.seed);
    engine.initialize(cli.maze_width, cli.maze_height);
    let controller = GameController::new(SharedEngine::new(engine), EventBus::new(), EventSource::Ui);

    let services = Services::start(cli.service_config(), &controller)?;

    if cli.headless {
        info!("running headless; press Ctrl-C to stop");
        return services.wait_for_shutdown();
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &controller, &services);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, controller: &GameController, services: &Services) -> Result<()> {
    let view = MazeView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut events = controller.bus().subscribe();
    let mut last_event: Option<String> = None;
    let poll = Duration::from_millis(TICK_MS);

    loop {
        // Follow changes made by any front-end.
        loop {
            match events.try_recv() {
                Ok(ev) if matches!(ev.kind, EventKind::GameStateUpdated) => {}
                Ok(ev) => last_event = Some(ev.describe()),
                Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        // Render.
        let state = controller.current_state()?;
        let grid = controller.maze()?;
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let status = services.status_view(last_event.clone());
        view.render_into(&grid, &state, &status, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input.
        if event::poll(poll)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = handle_key_event(key) {
                        apply(controller, command)?;
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }
    }
}

fn apply(controller: &GameController, command: UiCommand) -> Result<()> {
    match command {
        UiCommand::Move(direction) => {
            let result = controller.move_player(direction)?;
            debug!("ui move {} -> {}", direction, result.outcome.as_str());
        }
        UiCommand::Reset => {
            controller.reset_level()?;
        }
        UiCommand::NewLevel => {
            controller.new_level();
        }
    }
    Ok(())
}
