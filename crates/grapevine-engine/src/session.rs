//! Server-side session storage.
//!
//! Sessions map a browser's [`SessionId`] cookie to its [`SessionProgress`].
//! The handler pattern is load → thread through engine calls → save; each
//! session is only ever touched by its own player's requests, so no
//! cross-session synchronization is needed beyond the map lock.

use std::collections::HashMap;
use std::sync::RwLock;

use grapevine_types::{SessionId, SessionProgress};

/// In-memory map of live sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionProgress>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a session's progress, starting fresh for unknown ids.
    pub fn load(&self, id: SessionId) -> SessionProgress {
        let sessions = self.sessions.read().expect("lock poisoned");
        sessions.get(&id).cloned().unwrap_or_default()
    }

    /// Persist a session's progress.
    pub fn save(&self, id: SessionId, progress: SessionProgress) {
        let mut sessions = self.sessions.write().expect("lock poisoned");
        sessions.insert(id, progress);
    }

    /// Drop a session entirely (the explicit "clear" action).
    pub fn clear(&self, id: SessionId) {
        let mut sessions = self.sessions.write().expect("lock poisoned");
        sessions.remove(&id);
    }

    /// Number of sessions currently held.
    pub fn len(&self) -> usize {
        self.sessions.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().expect("lock poisoned").is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapevine_types::{ChainId, MessageId};

    #[test]
    fn unknown_sessions_start_fresh() {
        let store = SessionStore::new();
        let progress = store.load(SessionId::generate());
        assert!(!progress.instructed);
        assert!(progress.receipts.is_empty());
    }

    #[test]
    fn progress_survives_a_round_trip() {
        let store = SessionStore::new();
        let id = SessionId::generate();

        let mut progress = store.load(id);
        progress.instructed = true;
        progress.record_response(ChainId::new(1), MessageId::new(5));
        store.save(id, progress.clone());

        assert_eq!(store.load(id), progress);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_forgets_the_session() {
        let store = SessionStore::new();
        let id = SessionId::generate();
        let mut progress = store.load(id);
        progress.instructed = true;
        store.save(id, progress);

        store.clear(id);
        assert!(store.is_empty());
        assert!(!store.load(id).instructed);
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::new();
        let a = SessionId::generate();
        let b = SessionId::generate();

        let mut progress = store.load(a);
        progress.record_response(ChainId::new(1), MessageId::new(2));
        store.save(a, progress);

        assert!(store.load(b).receipts.is_empty());
    }
}
