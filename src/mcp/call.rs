//! Typed tool invocations.
//!
//! Arguments arrive as an untyped JSON object. They are converted once,
//! here, into a [`ToolCall`] so the tool implementations only ever see
//! typed values.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::db::{
    AgentQuery, ContextQuery, NewContext, NewTask, TaskPriority, TaskQuery, TaskStatus,
};

/// Why a `tools/call` could not be turned into a [`ToolCall`].
#[derive(Debug, Error, PartialEq)]
pub enum CallError {
    /// Not in the catalog. Reported as a protocol error.
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// Missing or mistyped argument. Reported in-band.
    #[error("{0}")]
    InvalidArguments(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    ListProjects,
    GetProject { project_id: String },
    ListAgents(AgentQuery),
    GetAgent { agent_id: String },
    ListTasks(TaskQuery),
    CreateTask(NewTask),
    UpdateTaskStatus { task_id: String, status: TaskStatus },
    ListContexts(ContextQuery),
    AddContext(NewContext),
    GetDashboard,
}

#[derive(Deserialize)]
struct ProjectIdArgs {
    project_id: String,
}

#[derive(Deserialize)]
struct AgentIdArgs {
    agent_id: String,
}

#[derive(Deserialize)]
struct ProjectFilterArgs {
    project_id: Option<String>,
}

#[derive(Deserialize)]
struct ListTasksArgs {
    project_id: Option<String>,
    agent_id: Option<String>,
    status: Option<String>,
}

#[derive(Deserialize)]
struct CreateTaskArgs {
    project_id: String,
    title: String,
    description: Option<String>,
    priority: Option<String>,
    assigned_to: Option<String>,
}

#[derive(Deserialize)]
struct UpdateTaskStatusArgs {
    task_id: String,
    status: String,
}

#[derive(Deserialize)]
struct AddContextArgs {
    project_id: String,
    title: String,
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

fn args<T: DeserializeOwned>(arguments: &Map<String, Value>) -> Result<T, CallError> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| CallError::InvalidArguments(format!("invalid arguments: {e}")))
}

/// Empty strings count as "not given" for optional filters.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_status(value: &str) -> Result<TaskStatus, CallError> {
    value.parse().map_err(CallError::InvalidArguments)
}

impl ToolCall {
    /// Resolve a tool name and its arguments. `arguments` may be absent,
    /// `null`, or an object.
    pub fn parse(name: &str, arguments: Option<&Value>) -> Result<Self, CallError> {
        let empty = Map::new();
        let arguments = match arguments {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(_) => {
                // Unknown names still win over malformed arguments.
                return match super::catalog::find_tool(name) {
                    Some(_) => Err(CallError::InvalidArguments(
                        "arguments must be an object".to_string(),
                    )),
                    None => Err(CallError::UnknownTool(name.to_string())),
                };
            }
        };

        let call = match name {
            "list_projects" => ToolCall::ListProjects,
            "get_project" => {
                let a: ProjectIdArgs = args(arguments)?;
                ToolCall::GetProject {
                    project_id: a.project_id,
                }
            }
            "list_agents" => {
                let a: ProjectFilterArgs = args(arguments)?;
                ToolCall::ListAgents(AgentQuery {
                    project_id: non_empty(a.project_id),
                })
            }
            "get_agent" => {
                let a: AgentIdArgs = args(arguments)?;
                ToolCall::GetAgent {
                    agent_id: a.agent_id,
                }
            }
            "list_tasks" => {
                let a: ListTasksArgs = args(arguments)?;
                let status = non_empty(a.status)
                    .map(|s| parse_status(&s))
                    .transpose()?;
                ToolCall::ListTasks(TaskQuery {
                    project_id: non_empty(a.project_id),
                    agent_id: non_empty(a.agent_id),
                    status,
                })
            }
            "create_task" => {
                let a: CreateTaskArgs = args(arguments)?;
                let priority = match non_empty(a.priority) {
                    Some(p) => p
                        .parse::<TaskPriority>()
                        .map_err(CallError::InvalidArguments)?,
                    None => TaskPriority::default(),
                };
                ToolCall::CreateTask(NewTask {
                    project_id: a.project_id,
                    title: a.title,
                    description: non_empty(a.description),
                    priority,
                    created_by: None,
                    assigned_to: non_empty(a.assigned_to),
                })
            }
            "update_task_status" => {
                let a: UpdateTaskStatusArgs = args(arguments)?;
                ToolCall::UpdateTaskStatus {
                    task_id: a.task_id,
                    status: parse_status(&a.status)?,
                }
            }
            "list_contexts" => {
                let a: ProjectFilterArgs = args(arguments)?;
                ToolCall::ListContexts(ContextQuery {
                    project_id: non_empty(a.project_id),
                    tags: Vec::new(),
                })
            }
            "add_context" => {
                let a: AddContextArgs = args(arguments)?;
                ToolCall::AddContext(NewContext {
                    project_id: a.project_id,
                    agent_id: None,
                    task_id: None,
                    title: a.title,
                    content: a.content,
                    tags: a.tags,
                })
            }
            "get_dashboard" => ToolCall::GetDashboard,
            other => return Err(CallError::UnknownTool(other.to_string())),
        };
        Ok(call)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ListProjects => "list_projects",
            ToolCall::GetProject { .. } => "get_project",
            ToolCall::ListAgents(_) => "list_agents",
            ToolCall::GetAgent { .. } => "get_agent",
            ToolCall::ListTasks(_) => "list_tasks",
            ToolCall::CreateTask(_) => "create_task",
            ToolCall::UpdateTaskStatus { .. } => "update_task_status",
            ToolCall::ListContexts(_) => "list_contexts",
            ToolCall::AddContext(_) => "add_context",
            ToolCall::GetDashboard => "get_dashboard",
        }
    }
}
