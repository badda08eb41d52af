//! Context (shared documentation) tools.

use std::sync::Arc;

use serde_json::json;

use crate::db::{ContextQuery, ContextRepository, Database, NewContext};
use crate::hub::{EventTag, HubHandle};
use crate::mcp::protocol::ToolOutcome;

use super::{connected, respond};

pub struct ContextTools<D: Database> {
    db: Option<Arc<D>>,
    hub: HubHandle,
}

impl<D: Database> ContextTools<D> {
    pub fn new(db: Option<Arc<D>>, hub: HubHandle) -> Self {
        Self { db, hub }
    }

    pub async fn list_contexts(&self, query: &ContextQuery) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        respond(db.contexts().list(query).await)
    }

    pub async fn add_context(&self, context: &NewContext) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        let context = match db.contexts().create(context).await {
            Ok(context) => context,
            Err(e) => return ToolOutcome::error(e.to_string()),
        };

        self.hub.broadcast(&context.project_id, EventTag::ContextAdded, &context);

        ToolOutcome::json(&json!({
            "success": true,
            "id": context.id,
            "title": context.title,
            "created_at": context.created_at,
        }))
    }
}
