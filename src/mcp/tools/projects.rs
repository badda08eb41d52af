//! Project tools.

use std::sync::Arc;

use crate::db::{Database, ProjectRepository};
use crate::mcp::protocol::ToolOutcome;

use super::{connected, respond};

pub struct ProjectTools<D: Database> {
    db: Option<Arc<D>>,
}

impl<D: Database> ProjectTools<D> {
    pub fn new(db: Option<Arc<D>>) -> Self {
        Self { db }
    }

    /// All projects, newest first.
    pub async fn list_projects(&self) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        respond(db.projects().list().await)
    }

    pub async fn get_project(&self, project_id: &str) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        respond(db.projects().get(project_id).await)
    }
}
