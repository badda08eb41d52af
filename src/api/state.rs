//! Application state for the HTTP server.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::Config;
use crate::db::{Database, DbError};
use crate::hub::HubHandle;
use crate::mcp::{Dispatcher, McpState, SessionStore};

/// Shared application state.
///
/// Generic over `D: Database` so tests can run against an in-memory store.
/// The store is optional: the server keeps running without one.
pub struct AppState<D: Database> {
    db: Option<Arc<D>>,
    hub: HubHandle,
    mcp: McpState<D>,
    queue_capacity: usize,
}

// Manual Clone impl - only the Arcs are cloned, D need not be Clone
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            hub: self.hub.clone(),
            mcp: self.mcp.clone(),
            queue_capacity: self.queue_capacity,
        }
    }
}

impl<D: Database + 'static> AppState<D> {
    pub fn new(
        db: Option<Arc<D>>,
        hub: HubHandle,
        config: &Config,
        shutdown: CancellationToken,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(db.clone(), hub.clone()));
        Self {
            db,
            hub,
            mcp: McpState {
                dispatcher,
                sessions: SessionStore::new(),
                keep_alive: config.keep_alive,
                shutdown,
            },
            queue_capacity: config.queue_capacity,
        }
    }
}

impl<D: Database> AppState<D> {
    /// The store, or [`DbError::Unavailable`] when running without one.
    pub fn db(&self) -> Result<&D, DbError> {
        self.db.as_deref().ok_or(DbError::Unavailable)
    }

    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    /// State for the protocol routes.
    pub fn mcp(&self) -> McpState<D> {
        self.mcp.clone()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn shutdown(&self) -> &CancellationToken {
        &self.mcp.shutdown
    }
}
