//! Per-user session state.
//!
//! Each browser session is a small key/value store ([`MemorySession`])
//! identified by a random UUID carried in a cookie. The [`SessionRegistry`]
//! holds every live session in memory; nothing is persisted to disk.
//! Idle sessions expire and the number of live sessions is capped.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use uuid::Uuid;

use crate::config::{MAX_SESSIONS, SESSION_IDLE_TIMEOUT_SECS};

// ═══════════════════════════════════════════════════════════
// SessionStore: key/value view of one session
// ═══════════════════════════════════════════════════════════

/// Key/value access to one user's session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn delete(&mut self, key: &str);
}

/// In-memory session values for one user.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: HashMap<String, Value>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn delete(&mut self, key: &str) {
        self.values.remove(key);
    }
}

// ═══════════════════════════════════════════════════════════
// SessionRegistry: all live sessions
// ═══════════════════════════════════════════════════════════

/// A session plus the time it was last used.
#[derive(Debug)]
struct LiveSession {
    store: MemorySession,
    last_active: Instant,
}

impl LiveSession {
    fn new() -> Self {
        Self {
            store: MemorySession::new(),
            last_active: Instant::now(),
        }
    }

    fn is_idle(&self, timeout: Duration) -> bool {
        self.last_active.elapsed() >= timeout
    }
}

/// All live sessions, keyed by the id in the session cookie.
///
/// Sessions idle for longer than the timeout are dropped. When the registry
/// is full the least recently used session makes room for a new one. Ids
/// are only ever minted here; an id the registry does not know is never
/// adopted.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, LiveSession>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_limits(
            Duration::from_secs(SESSION_IDLE_TIMEOUT_SECS),
            MAX_SESSIONS,
        )
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Look up a live session and mark it active. Idle sessions are evicted
    /// and read as absent.
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut MemorySession> {
        if self
            .sessions
            .get(id)
            .is_some_and(|s| s.is_idle(self.idle_timeout))
        {
            tracing::debug!(session = %id, "Session expired");
            self.evict(id);
            return None;
        }
        self.sessions.get_mut(id).map(|live| {
            live.last_active = Instant::now();
            &mut live.store
        })
    }

    /// Return the live session for `id`, or start a new one under a fresh id
    /// when `id` is absent, unknown, or expired. The returned id is the one
    /// the client must present from now on.
    pub fn get_or_create(&mut self, id: Option<Uuid>) -> (Uuid, &mut MemorySession) {
        self.evict_idle();

        let id = match id {
            Some(id) if self.sessions.contains_key(&id) => id,
            _ => self.create(),
        };
        let live = self.sessions.entry(id).or_insert_with(LiveSession::new);
        live.last_active = Instant::now();
        (id, &mut live.store)
    }

    fn create(&mut self) -> Uuid {
        if self.sessions.len() >= self.max_sessions {
            if let Some(oldest) = self
                .sessions
                .iter()
                .min_by_key(|(_, live)| live.last_active)
                .map(|(id, _)| *id)
            {
                tracing::warn!(session = %oldest, "Session limit reached; evicting least recently used");
                self.evict(&oldest);
            }
        }
        let id = Uuid::new_v4();
        self.sessions.insert(id, LiveSession::new());
        tracing::debug!(session = %id, "Session created");
        id
    }

    /// Drop every session idle past the timeout. Returns how many went.
    pub fn evict_idle(&mut self) -> usize {
        let idle: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|(_, live)| live.is_idle(self.idle_timeout))
            .map(|(id, _)| *id)
            .collect();
        for id in &idle {
            self.evict(id);
        }
        if !idle.is_empty() {
            tracing::debug!(count = idle.len(), "Idle sessions evicted");
        }
        idle.len()
    }

    /// Drop one session.
    pub fn evict(&mut self, id: &Uuid) {
        self.sessions.remove(id);
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session value could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
