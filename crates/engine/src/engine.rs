//! GameEngine - sole owner of the current grid and game state
//!
//! The engine is passive: it knows nothing about front-ends or the event bus.
//! Every accessor returns a `GameState` copy, and a level is swapped in as one
//! fully built value, so callers never observe a half-updated pair.

use std::sync::Arc;

use log::{debug, info};

use tui_maze_core::{
    exit_anchor, start_anchor, EngineError, GameState, Grid, MazeGenerator, MoveResult, Result,
    SimpleRng,
};
use tui_maze_types::{Direction, MazeSize, MoveOutcome, Position};

/// Grid and state of the level being played.
#[derive(Debug, Clone)]
struct Level {
    grid: Arc<Grid>,
    start: Position,
    state: GameState,
}

#[derive(Debug)]
pub struct GameEngine {
    generator: MazeGenerator,
    rng: SimpleRng,
    level: Option<Level>,
}

impl GameEngine {
    /// Create an engine that has not generated a level yet.
    ///
    /// Mazes default to [`MazeSize::default`] until [`initialize`](Self::initialize)
    /// picks a size. Without a seed the RNG is seeded from the clock.
    pub fn new(seed: Option<u32>) -> Self {
        let rng = match seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_time(),
        };
        Self {
            generator: MazeGenerator::default(),
            rng,
            level: None,
        }
    }

    /// Build an engine around a hand-made grid.
    ///
    /// Both anchors must be open cells of `grid`.
    pub fn with_grid(grid: Grid, start: Position, exit: Position) -> Result<Self> {
        for position in [start, exit] {
            if !grid.is_open(position) {
                return Err(EngineError::InvalidAnchor { position });
            }
        }
        let size = grid.size();
        let state = GameState::new(size, start, exit);
        Ok(Self {
            generator: MazeGenerator::new(size.width, size.height),
            rng: SimpleRng::default(),
            level: Some(Level {
                grid: Arc::new(grid),
                start,
                state,
            }),
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.level.is_some()
    }

    /// Size of the mazes this engine generates.
    pub fn maze_size(&self) -> MazeSize {
        self.generator.size()
    }

    /// Set the maze size and generate the first level.
    pub fn initialize(&mut self, width: usize, height: usize) -> GameState {
        self.generator = MazeGenerator::new(width, height);
        self.generate_new_level()
    }

    /// Replace the current level with a freshly generated maze.
    pub fn generate_new_level(&mut self) -> GameState {
        let size = self.generator.size();
        let mut grid = self.generator.generate(&mut self.rng);

        let start = start_anchor(size);
        let exit = exit_anchor(size);
        // Breach the border so both anchors join the maze.
        for pos in [
            start,
            Position::new(start.row, start.col + 1),
            Position::new(exit.row, exit.col - 1),
            exit,
        ] {
            grid.carve(pos);
        }

        let state = GameState::new(size, start, exit);
        self.level = Some(Level {
            grid: Arc::new(grid),
            start,
            state,
        });
        info!(
            "new level {}x{} start {} exit {}",
            size.width, size.height, start, exit
        );
        state
    }

    /// Attempt one move. Rejected moves are results, not errors.
    pub fn move_player(&mut self, direction: Direction) -> Result<MoveResult> {
        let level = self.level.as_mut().ok_or(EngineError::NotInitialized)?;
        let state = &mut level.state;

        if state.is_completed {
            return Ok(MoveResult::new(MoveOutcome::AlreadyAtExit, *state));
        }
        if direction == Direction::Wait {
            return Ok(MoveResult::waited(*state));
        }

        let candidate = state
            .player_position
            .step(direction)
            .filter(|pos| level.grid.contains(*pos));
        let Some(candidate) = candidate else {
            debug!("move {} from {} out of bounds", direction, state.player_position);
            return Ok(MoveResult::new(MoveOutcome::OutOfBounds, *state));
        };
        if level.grid.is_wall(candidate) {
            debug!("move {} from {} hit a wall", direction, state.player_position);
            return Ok(MoveResult::new(MoveOutcome::Wall, *state));
        }

        state.player_position = candidate;
        state.move_count += 1;
        if candidate == state.exit_position {
            state.is_completed = true;
            info!("exit reached in {} moves", state.move_count);
        }
        debug!("move {} to {}", direction, candidate);
        Ok(MoveResult::new(MoveOutcome::Success, *state))
    }

    /// Put the player back on the start anchor of the current maze.
    pub fn reset_current_level(&mut self) -> Result<GameState> {
        let level = self.level.as_mut().ok_or(EngineError::NotInitialized)?;
        level.state = GameState::new(level.state.maze_size, level.start, level.state.exit_position);
        info!("level reset");
        Ok(level.state)
    }

    pub fn current_state(&self) -> Result<GameState> {
        self.level
            .as_ref()
            .map(|level| level.state)
            .ok_or(EngineError::NotInitialized)
    }

    /// Read-only view of the current maze.
    pub fn maze(&self) -> Result<Arc<Grid>> {
        self.level
            .as_ref()
            .map(|level| Arc::clone(&level.grid))
            .ok_or(EngineError::NotInitialized)
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(None)
    }
}
