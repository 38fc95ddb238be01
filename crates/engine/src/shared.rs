//! Thread-safe handle to a single engine.
//!
//! Every front-end holds a clone. Mutations take the write lock for their whole
//! check-then-commit sequence; queries take the read lock. [`SharedEngine::mutate`]
//! extends the write section to work that must stay in mutation order.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tui_maze_core::{GameState, Grid, MoveResult, Result};
use tui_maze_types::Direction;

use crate::engine::GameEngine;

#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<GameEngine>>,
}

impl SharedEngine {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    // A panic under the lock cannot leave a half-applied level: each
    // mutation ends in a single assignment.
    pub fn read(&self) -> RwLockReadGuard<'_, GameEngine> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, GameEngine> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access. Nothing in `f` may lock this engine again.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut GameEngine) -> T) -> T {
        f(&mut self.write())
    }

    pub fn move_player(&self, direction: Direction) -> Result<MoveResult> {
        self.write().move_player(direction)
    }

    pub fn reset_current_level(&self) -> Result<GameState> {
        self.write().reset_current_level()
    }

    pub fn generate_new_level(&self) -> GameState {
        self.write().generate_new_level()
    }

    pub fn current_state(&self) -> Result<GameState> {
        self.read().current_state()
    }

    pub fn maze(&self) -> Result<Arc<Grid>> {
        self.read().maze()
    }
}

impl From<GameEngine> for SharedEngine {
    fn from(engine: GameEngine) -> Self {
        Self::new(engine)
    }
}
