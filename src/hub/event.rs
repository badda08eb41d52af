//! Fan-out message shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mutation kinds announced to live connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    ProjectCreated,
    ProjectUpdated,
    ProjectDeleted,
    AgentCreated,
    AgentUpdated,
    AgentDeleted,
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    ContextAdded,
    ContextUpdated,
    ContextDeleted,
}

impl EventTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTag::ProjectCreated => "project_created",
            EventTag::ProjectUpdated => "project_updated",
            EventTag::ProjectDeleted => "project_deleted",
            EventTag::AgentCreated => "agent_created",
            EventTag::AgentUpdated => "agent_updated",
            EventTag::AgentDeleted => "agent_deleted",
            EventTag::TaskCreated => "task_created",
            EventTag::TaskUpdated => "task_updated",
            EventTag::TaskDeleted => "task_deleted",
            EventTag::ContextAdded => "context_added",
            EventTag::ContextUpdated => "context_updated",
            EventTag::ContextDeleted => "context_deleted",
        }
    }
}

impl std::fmt::Display for EventTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broadcast, scoped to a project.
///
/// The project id selects recipients and is not part of the wire shape,
/// which is `{"type": <tag>, "payload": <value>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip)]
    pub project_id: String,
    #[serde(rename = "type")]
    pub tag: EventTag,
    pub payload: Value,
}

impl Event {
    pub fn new(project_id: impl Into<String>, tag: EventTag, payload: Value) -> Self {
        Self {
            project_id: project_id.into(),
            tag,
            payload,
        }
    }
}
