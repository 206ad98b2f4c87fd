//! In-Memory Session Store Adapter
//!
//! Keeps the session for the lifetime of the process only.
//! Useful for tests and for running with persistence disabled.

use std::sync::{Arc, RwLock};

use crate::domain::Session;
use crate::ports::SessionStore;

/// In-memory storage for the current session
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    slot: Arc<RwLock<Option<Session>>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(session))),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, session: Session) {
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session);
    }

    fn clear(&self) {
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
