//! Per-browser-session storage of the most recent extraction.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use nanoid::nanoid;

use crate::extraction::EventList;

/// Name of the signed cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sof_session";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(nanoid!())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds at most one [`EventList`] per session.
pub trait SessionStore: Send + Sync {
    /// Events stored for the session, or an empty list when none are.
    fn get(&self, id: &SessionId) -> EventList;

    /// Replace whatever the session held with `events`.
    fn put(&self, id: SessionId, events: EventList);
}

/// In-process store that forgets the least recently used sessions once
/// `capacity` is reached. Contents are lost on restart.
pub struct InMemorySessionStore {
    entries: Mutex<LruCache<SessionId, EventList>>,
}

impl InMemorySessionStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<SessionId, EventList>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: &SessionId) -> EventList {
        self.lock().get(id).cloned().unwrap_or_default()
    }

    fn put(&self, id: SessionId, events: EventList) {
        tracing::debug!(session = %id, event_count = events.len(), "Storing session events");
        self.lock().put(id, events);
    }
}
