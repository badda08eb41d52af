//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//! Every method returns a `Send` future so callers can be generic over
//! the backend inside axum handlers and spawned tasks.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{
        Agent, AgentQuery, AgentStatus, Context, ContextQuery, ContextUpdate, DashboardStats,
        NewAgent, NewContext, NewProject, NewTask, Project, ProjectStatus, Task, TaskQuery,
        TaskStatus, TaskUpdate,
    },
};

/// Repository for Project operations.
pub trait ProjectRepository {
    /// Create a new project.
    fn create(&self, project: &NewProject) -> impl Future<Output = DbResult<Project>> + Send;

    /// Get a project by ID.
    fn get(&self, id: &str) -> impl Future<Output = DbResult<Project>> + Send;

    /// Get all projects, newest first.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Project>>> + Send;

    /// Change a project's status.
    fn update_status(
        &self,
        id: &str,
        status: ProjectStatus,
    ) -> impl Future<Output = DbResult<Project>> + Send;

    /// Delete a project by ID, returning the removed row.
    fn delete(&self, id: &str) -> impl Future<Output = DbResult<Project>> + Send;
}

/// Repository for Agent operations.
pub trait AgentRepository {
    fn create(&self, agent: &NewAgent) -> impl Future<Output = DbResult<Agent>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<Agent>> + Send;

    /// List agents, newest first.
    fn list(&self, query: &AgentQuery) -> impl Future<Output = DbResult<Vec<Agent>>> + Send;

    /// Change an agent's status and refresh `last_seen`.
    fn update_status(
        &self,
        id: &str,
        status: AgentStatus,
    ) -> impl Future<Output = DbResult<Agent>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<Agent>> + Send;
}

/// Repository for Task operations.
pub trait TaskRepository {
    /// Create a new task in `pending` state.
    fn create(&self, task: &NewTask) -> impl Future<Output = DbResult<Task>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<Task>> + Send;

    /// List tasks matching the query, newest first.
    fn list(&self, query: &TaskQuery) -> impl Future<Output = DbResult<Vec<Task>>> + Send;

    /// Apply a partial update.
    fn update(
        &self,
        id: &str,
        update: &TaskUpdate,
    ) -> impl Future<Output = DbResult<Task>> + Send;

    fn update_status(
        &self,
        id: &str,
        status: TaskStatus,
    ) -> impl Future<Output = DbResult<Task>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<Task>> + Send;
}

/// Repository for Context operations.
pub trait ContextRepository {
    fn create(&self, context: &NewContext) -> impl Future<Output = DbResult<Context>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<Context>> + Send;

    /// List contexts matching the query, newest first.
    fn list(&self, query: &ContextQuery) -> impl Future<Output = DbResult<Vec<Context>>> + Send;

    fn update(
        &self,
        id: &str,
        update: &ContextUpdate,
    ) -> impl Future<Output = DbResult<Context>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<Context>> + Send;
}

/// Combined tracker store interface.
pub trait Database: Send + Sync {
    type Projects<'a>: ProjectRepository + Send + Sync
    where
        Self: 'a;
    type Agents<'a>: AgentRepository + Send + Sync
    where
        Self: 'a;
    type Tasks<'a>: TaskRepository + Send + Sync
    where
        Self: 'a;
    type Contexts<'a>: ContextRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    fn projects(&self) -> Self::Projects<'_>;

    fn agents(&self) -> Self::Agents<'_>;

    fn tasks(&self) -> Self::Tasks<'_>;

    fn contexts(&self) -> Self::Contexts<'_>;

    /// Aggregate counts across every collection.
    fn dashboard_stats(&self) -> impl Future<Output = DbResult<DashboardStats>> + Send;
}
