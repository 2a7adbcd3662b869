use std::sync::Arc;

use grapevine_engine::{GameEngine, SessionStore};
use grapevine_store::{FsAudioStore, InMemoryAudioStore, InMemoryGameStore};

use crate::config::ServerConfig;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GameEngine>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Production wiring: entities in memory, recordings on disk under the
    /// configured media root.
    pub fn new(config: ServerConfig) -> Self {
        let engine = GameEngine::new(
            Arc::new(InMemoryGameStore::new()),
            Arc::new(FsAudioStore::new(config.media_root.clone())),
        )
        .with_max_pick_attempts(config.max_pick_attempts);
        Self::with_engine(engine, config)
    }

    /// Fully in-memory wiring for tests and embedding.
    pub fn in_memory(config: ServerConfig) -> Self {
        let engine = GameEngine::new(
            Arc::new(InMemoryGameStore::new()),
            Arc::new(InMemoryAudioStore::new()),
        )
        .with_max_pick_attempts(config.max_pick_attempts);
        Self::with_engine(engine, config)
    }

    fn with_engine(engine: GameEngine, config: ServerConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
        }
    }
}
