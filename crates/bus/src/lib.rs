//! Notification layer
//!
//! The engine is passive; front-ends drive it through a [`GameController`],
//! which publishes a [`GameEvent`] on the shared [`EventBus`] after every
//! mutating call. The terminal UI and streaming AI clients subscribe to the
//! bus, so a move made over HTTP shows up everywhere.
//!
//! The bus is built once by the composition root and cloned into each
//! front-end; there is no global instance.
//!
//! | Call | Events |
//! |------|--------|
//! | move | `PlayerMoved`, `GameStateUpdated` |
//! | reset | `LevelReset`, `GameStateUpdated` |
//! | new level | `NewLevelGenerated`, `GameStateUpdated` |

pub mod controller;
pub mod event;

pub use controller::GameController;
pub use event::{current_timestamp_ms, EventBus, EventKind, EventSource, GameEvent};
