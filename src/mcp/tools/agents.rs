//! Agent tools.

use std::sync::Arc;

use crate::db::{AgentQuery, AgentRepository, Database};
use crate::mcp::protocol::ToolOutcome;

use super::{connected, respond};

pub struct AgentTools<D: Database> {
    db: Option<Arc<D>>,
}

impl<D: Database> AgentTools<D> {
    pub fn new(db: Option<Arc<D>>) -> Self {
        Self { db }
    }

    pub async fn list_agents(&self, query: &AgentQuery) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        respond(db.agents().list(query).await)
    }

    pub async fn get_agent(&self, agent_id: &str) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        respond(db.agents().get(agent_id).await)
    }
}
