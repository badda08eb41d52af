//! Task tools. Writes are announced on the hub.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::db::{Database, NewTask, TaskQuery, TaskRepository, TaskStatus};
use crate::hub::{EventTag, HubHandle};
use crate::mcp::protocol::ToolOutcome;

use super::{connected, respond};

pub struct TaskTools<D: Database> {
    db: Option<Arc<D>>,
    hub: HubHandle,
}

impl<D: Database> TaskTools<D> {
    pub fn new(db: Option<Arc<D>>, hub: HubHandle) -> Self {
        Self { db, hub }
    }

    /// Tasks matching every given filter, newest first.
    pub async fn list_tasks(&self, query: &TaskQuery) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        respond(db.tasks().list(query).await)
    }

    pub async fn create_task(&self, task: &NewTask) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        let task = match db.tasks().create(task).await {
            Ok(task) => task,
            Err(e) => return ToolOutcome::error(e.to_string()),
        };

        debug!(task_id = %task.id, project_id = %task.project_id, "task created via tool");
        self.hub.broadcast(&task.project_id, EventTag::TaskCreated, &task);

        ToolOutcome::json(&json!({
            "success": true,
            "id": task.id,
            "title": task.title,
            "status": task.status,
            "priority": task.priority,
            "created_at": task.created_at,
        }))
    }

    pub async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        let task = match db.tasks().update_status(task_id, status).await {
            Ok(task) => task,
            Err(e) => return ToolOutcome::error(e.to_string()),
        };

        self.hub.broadcast(&task.project_id, EventTag::TaskUpdated, &task);

        ToolOutcome::json(&json!({
            "success": true,
            "task_id": task.id,
            "status": task.status,
        }))
    }
}
