//! Static tool and resource descriptors advertised on discovery.

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::db::{TaskPriority, TaskStatus};

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    StringArray,
}

/// One named tool parameter.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
    /// Legal values; empty means unconstrained.
    pub allowed: &'static [&'static str],
}

impl Param {
    const fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::String,
            description,
            required: false,
            allowed: &[],
        }
    }

    const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::optional(name, description)
        }
    }

    const fn one_of(self, allowed: &'static [&'static str]) -> Self {
        Self { allowed, ..self }
    }

    const fn array(self) -> Self {
        Self {
            kind: ParamKind::StringArray,
            ..self
        }
    }
}

impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self.kind {
            ParamKind::String => map.serialize_entry("type", "string")?,
            ParamKind::StringArray => {
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", &serde_json::json!({"type": "string"}))?;
            }
        }
        map.serialize_entry("description", self.description)?;
        if !self.allowed.is_empty() {
            map.serialize_entry("enum", self.allowed)?;
        }
        map.end()
    }
}

/// An invocable tool.
#[derive(Debug)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [Param],
}

impl ToolDescriptor {
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }
}

struct InputSchema<'a>(&'a ToolDescriptor);

impl Serialize for InputSchema<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Properties<'a>(&'a [Param]);

        impl Serialize for Properties<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for param in self.0 {
                    map.serialize_entry(param.name, param)?;
                }
                map.end()
            }
        }

        let required: Vec<&str> = self.0.required().collect();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &Properties(self.0.params))?;
        if !required.is_empty() {
            map.serialize_entry("required", &required)?;
        }
        map.end()
    }
}

impl Serialize for ToolDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Tool", 3)?;
        s.serialize_field("name", self.name)?;
        s.serialize_field("description", self.description)?;
        s.serialize_field("inputSchema", &InputSchema(self))?;
        s.end()
    }
}

pub static TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "list_projects",
        description: "List all projects in the system",
        params: &[],
    },
    ToolDescriptor {
        name: "get_project",
        description: "Get details of a specific project",
        params: &[Param::required("project_id", "The project ID (UUID)")],
    },
    ToolDescriptor {
        name: "list_agents",
        description: "List all agents, optionally filtered by project",
        params: &[Param::optional(
            "project_id",
            "Optional project ID to filter agents",
        )],
    },
    ToolDescriptor {
        name: "get_agent",
        description: "Get details of a specific agent",
        params: &[Param::required("agent_id", "The agent ID (UUID)")],
    },
    ToolDescriptor {
        name: "list_tasks",
        description: "List tasks, optionally filtered by project, agent or status",
        params: &[
            Param::optional("project_id", "Optional project ID to filter tasks"),
            Param::optional("agent_id", "Optional assignee agent ID to filter tasks"),
            Param::optional("status", "Optional status filter").one_of(TaskStatus::ALL),
        ],
    },
    ToolDescriptor {
        name: "create_task",
        description: "Create a new task in a project",
        params: &[
            Param::required("project_id", "The project ID"),
            Param::required("title", "Task title"),
            Param::optional("description", "Task description"),
            Param::optional("priority", "Priority: low, medium (default), high")
                .one_of(TaskPriority::ALL),
            Param::optional("assigned_to", "Agent ID to assign the task to"),
        ],
    },
    ToolDescriptor {
        name: "update_task_status",
        description: "Update the status of a task",
        params: &[
            Param::required("task_id", "The task ID"),
            Param::required("status", "New status").one_of(TaskStatus::ALL),
        ],
    },
    ToolDescriptor {
        name: "list_contexts",
        description: "List documentation/contexts for a project",
        params: &[Param::optional(
            "project_id",
            "Optional project ID to filter contexts",
        )],
    },
    ToolDescriptor {
        name: "add_context",
        description: "Add documentation or context to a project",
        params: &[
            Param::required("project_id", "The project ID"),
            Param::required("title", "Context title"),
            Param::required("content", "Context content (markdown supported)"),
            Param::optional("tags", "Tags for categorization").array(),
        ],
    },
    ToolDescriptor {
        name: "get_dashboard",
        description: "Get dashboard statistics and overview",
        params: &[],
    },
];

/// Collections readable through `resources/read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Projects,
    Agents,
    Tasks,
    Dashboard,
}

/// A readable resource.
#[derive(Debug)]
pub struct ResourceDescriptor {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ResourceKind,
}

pub const RESOURCE_MIME_TYPE: &str = "application/json";

impl Serialize for ResourceDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Resource", 4)?;
        s.serialize_field("uri", self.uri)?;
        s.serialize_field("name", self.name)?;
        s.serialize_field("description", self.description)?;
        s.serialize_field("mimeType", RESOURCE_MIME_TYPE)?;
        s.end()
    }
}

pub static RESOURCES: &[ResourceDescriptor] = &[
    ResourceDescriptor {
        uri: "agent-shaker://projects",
        name: "Projects",
        description: "List of all projects",
        kind: ResourceKind::Projects,
    },
    ResourceDescriptor {
        uri: "agent-shaker://agents",
        name: "Agents",
        description: "List of all agents",
        kind: ResourceKind::Agents,
    },
    ResourceDescriptor {
        uri: "agent-shaker://tasks",
        name: "Tasks",
        description: "List of all tasks",
        kind: ResourceKind::Tasks,
    },
    ResourceDescriptor {
        uri: "agent-shaker://dashboard",
        name: "Dashboard",
        description: "Dashboard statistics",
        kind: ResourceKind::Dashboard,
    },
];

pub fn find_tool(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.name == name)
}

pub fn find_resource(uri: &str) -> Option<&'static ResourceDescriptor> {
    RESOURCES.iter().find(|r| r.uri == uri)
}
