//! Event-stream session registry.
//!
//! Sessions only exist while their stream is open. The store exposes
//! insert, lookup and delete; nothing iterates it from outside.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Whatever the client told us when the stream opened.
    pub client_info: Option<Value>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a session with a fresh id. The session lives until the
    /// returned guard is dropped.
    pub fn open(&self, client_info: Option<Value>) -> SessionGuard {
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if let Entry::Vacant(slot) = self.sessions.entry(candidate.clone()) {
                slot.insert(Session {
                    id: candidate.clone(),
                    created_at: Utc::now(),
                    client_info: client_info.clone(),
                });
                break candidate;
            }
        };

        info!(session_id = %id, "session opened");
        SessionGuard {
            id,
            store: self.clone(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|s| s.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Remove a session. Returns `false` if it was already gone.
    pub fn close(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Owns one live session and closes it on drop.
pub struct SessionGuard {
    id: String,
    store: SessionStore,
}

impl SessionGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.store.close(&self.id) {
            info!(session_id = %self.id, "session closed");
        }
    }
}
