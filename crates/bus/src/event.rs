//! Game events and the publish/subscribe bus that carries them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use tokio::sync::broadcast;

use tui_maze_core::GameState;
use tui_maze_types::{Direction, MoveOutcome, EVENT_HISTORY_LIMIT};

/// Broadcast channel capacity; slow subscribers lag past this.
pub const CHANNEL_CAPACITY: usize = 256;

/// Front-end that caused an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    Ui,
    Http,
    Agent,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::Ui => "ui",
            EventSource::Http => "http",
            EventSource::Agent => "agent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    GameStateUpdated,
    PlayerMoved {
        direction: Direction,
        outcome: MoveOutcome,
    },
    LevelReset,
    NewLevelGenerated,
}

impl EventKind {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::GameStateUpdated => "game_state_updated",
            EventKind::PlayerMoved { .. } => "player_moved",
            EventKind::LevelReset => "level_reset",
            EventKind::NewLevelGenerated => "new_level_generated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEvent {
    pub kind: EventKind,
    pub source: EventSource,
    /// Snapshot taken right after the change.
    pub state: GameState,
    pub ts_ms: u64,
}

impl GameEvent {
    pub fn new(kind: EventKind, source: EventSource, state: GameState) -> Self {
        Self {
            kind,
            source,
            state,
            ts_ms: current_timestamp_ms(),
        }
    }

    /// One-line summary for status displays.
    pub fn describe(&self) -> String {
        let what = match self.kind {
            EventKind::GameStateUpdated => "state updated".to_string(),
            EventKind::PlayerMoved { direction, outcome } => {
                format!("move {} -> {}", direction, outcome.as_str())
            }
            EventKind::LevelReset => "level reset".to_string(),
            EventKind::NewLevelGenerated => "new level".to_string(),
        };
        format!("[{}] {}", self.source.as_str(), what)
    }
}

/// Publish/subscribe hub shared by all front-ends.
///
/// Cloning is cheap; every clone publishes into the same channel and history.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GameEvent>,
    history: Arc<Mutex<VecDeque<GameEvent>>>,
    history_limit: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_limits(CHANNEL_CAPACITY, EVENT_HISTORY_LIMIT)
    }

    pub fn with_limits(capacity: usize, history_limit: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            history: Arc::new(Mutex::new(VecDeque::with_capacity(history_limit))),
            history_limit,
        }
    }

    fn lock_history(&self) -> MutexGuard<'_, VecDeque<GameEvent>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record and broadcast an event. Returns the number of live subscribers
    /// it was delivered to.
    pub fn publish(&self, event: GameEvent) -> usize {
        {
            let mut history = self.lock_history();
            if self.history_limit > 0 {
                if history.len() == self.history_limit {
                    history.pop_front();
                }
                history.push_back(event);
            }
        }
        debug!("event {} from {}", event.kind.as_str(), event.source.as_str());
        // No subscribers is not an error.
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }

    /// Recorded events, oldest first.
    pub fn history(&self) -> Vec<GameEvent> {
        self.lock_history().iter().copied().collect()
    }

    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
