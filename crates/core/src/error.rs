use thiserror::Error;

use crate::types::Position;

/// Errors raised by the engine.
///
/// Expected move outcomes (walls, bounds, completed level) are never errors;
/// see [`crate::types::MoveOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine was queried or moved before its first level was generated.
    #[error("Game not initialized")]
    NotInitialized,
    #[error("Anchor {position} is not an open cell")]
    InvalidAnchor { position: Position },
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}

pub type Result<T> = core::result::Result<T, EngineError>;
