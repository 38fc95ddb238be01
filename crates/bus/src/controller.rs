//! Front-end side of the engine: call it, then tell everyone.

use std::sync::Arc;

use tui_maze_core::{GameState, Grid, MoveResult, Result};
use tui_maze_engine::SharedEngine;
use tui_maze_types::Direction;

use crate::event::{EventBus, EventKind, EventSource, GameEvent};

/// Engine handle bound to one front-end.
///
/// Every mutating call publishes its specific event followed by
/// `GameStateUpdated`. Publishing happens under the engine's write lock, so the
/// bus sees events in mutation order. Queries publish nothing.
#[derive(Debug, Clone)]
pub struct GameController {
    engine: SharedEngine,
    bus: EventBus,
    source: EventSource,
}

impl GameController {
    pub fn new(engine: SharedEngine, bus: EventBus, source: EventSource) -> Self {
        Self {
            engine,
            bus,
            source,
        }
    }

    /// Same engine and bus, attributed to another front-end.
    pub fn with_source(&self, source: EventSource) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn source(&self) -> EventSource {
        self.source
    }

    pub fn move_player(&self, direction: Direction) -> Result<MoveResult> {
        self.engine.mutate(|engine| {
            let result = engine.move_player(direction)?;
            self.announce(
                EventKind::PlayerMoved {
                    direction,
                    outcome: result.outcome,
                },
                result.state,
            );
            Ok(result)
        })
    }

    pub fn reset_level(&self) -> Result<GameState> {
        self.engine.mutate(|engine| {
            let state = engine.reset_current_level()?;
            self.announce(EventKind::LevelReset, state);
            Ok(state)
        })
    }

    pub fn new_level(&self) -> GameState {
        self.engine.mutate(|engine| {
            let state = engine.generate_new_level();
            self.announce(EventKind::NewLevelGenerated, state);
            state
        })
    }

    pub fn current_state(&self) -> Result<GameState> {
        self.engine.current_state()
    }

    pub fn maze(&self) -> Result<Arc<Grid>> {
        self.engine.maze()
    }

    fn announce(&self, kind: EventKind, state: GameState) {
        self.bus.publish(GameEvent::new(kind, self.source, state));
        self.bus
            .publish(GameEvent::new(EventKind::GameStateUpdated, self.source, state));
    }
}
