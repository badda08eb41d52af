//! Tool implementations, one struct per tracker collection.
//!
//! Each struct is generic over `D: Database` and holds an optional store
//! handle. A missing store is reported in-band, never as a panic.

mod agents;
mod contexts;
mod dashboard;
mod projects;
mod tasks;

#[cfg(test)]
mod agents_test;
#[cfg(test)]
mod contexts_test;

pub use agents::AgentTools;
pub use contexts::ContextTools;
pub use dashboard::DashboardTools;
pub use projects::ProjectTools;
pub use tasks::TaskTools;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::db::{AgentQuery, Database, DbError, DbResult, TaskQuery};
use crate::hub::HubHandle;
use crate::mcp::call::ToolCall;
use crate::mcp::catalog::ResourceKind;
use crate::mcp::protocol::ToolOutcome;

/// Store handle or the in-band "not connected" failure.
pub(crate) fn connected<D: Database>(db: &Option<Arc<D>>) -> Result<&D, ToolOutcome> {
    db.as_deref()
        .ok_or_else(|| ToolOutcome::error(DbError::Unavailable.to_string()))
}

/// Pretty JSON on success, `{"error": ...}` on failure.
pub(crate) fn respond<T: Serialize>(result: DbResult<T>) -> ToolOutcome {
    match result {
        Ok(value) => ToolOutcome::json(&value),
        Err(e) => ToolOutcome::error(e.to_string()),
    }
}

/// Every tool, routed by [`ToolCall`].
pub struct Tools<D: Database> {
    projects: ProjectTools<D>,
    agents: AgentTools<D>,
    tasks: TaskTools<D>,
    contexts: ContextTools<D>,
    dashboard: DashboardTools<D>,
}

impl<D: Database + 'static> Tools<D> {
    pub fn new(db: Option<Arc<D>>, hub: HubHandle) -> Self {
        Self {
            projects: ProjectTools::new(db.clone()),
            agents: AgentTools::new(db.clone()),
            tasks: TaskTools::new(db.clone(), hub.clone()),
            contexts: ContextTools::new(db.clone(), hub),
            dashboard: DashboardTools::new(db),
        }
    }

    pub async fn execute(&self, call: ToolCall) -> ToolOutcome {
        let tool = call.name();
        info!(tool, "tool call");

        let outcome = match call {
            ToolCall::ListProjects => self.projects.list_projects().await,
            ToolCall::GetProject { project_id } => self.projects.get_project(&project_id).await,
            ToolCall::ListAgents(query) => self.agents.list_agents(&query).await,
            ToolCall::GetAgent { agent_id } => self.agents.get_agent(&agent_id).await,
            ToolCall::ListTasks(query) => self.tasks.list_tasks(&query).await,
            ToolCall::CreateTask(task) => self.tasks.create_task(&task).await,
            ToolCall::UpdateTaskStatus { task_id, status } => {
                self.tasks.update_task_status(&task_id, status).await
            }
            ToolCall::ListContexts(query) => self.contexts.list_contexts(&query).await,
            ToolCall::AddContext(context) => self.contexts.add_context(&context).await,
            ToolCall::GetDashboard => self.dashboard.get_dashboard().await,
        };
        if outcome.is_error {
            debug!(tool, error = %outcome.text, "tool reported failure");
        }
        outcome
    }

    /// Resource reads reuse the unfiltered listing tools.
    pub async fn read(&self, kind: ResourceKind) -> ToolOutcome {
        match kind {
            ResourceKind::Projects => self.projects.list_projects().await,
            ResourceKind::Agents => self.agents.list_agents(&AgentQuery::default()).await,
            ResourceKind::Tasks => self.tasks.list_tasks(&TaskQuery::default()).await,
            ResourceKind::Dashboard => self.dashboard.get_dashboard().await,
        }
    }
}
