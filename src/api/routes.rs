//! Route configuration.

use axum::Router;
use axum::routing::{delete, get, post, put};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::state::AppState;
use super::v1::{
    self, ErrorResponse, HealthResponse, UpdateAgentStatusRequest, UpdateProjectStatusRequest,
    UpdateTaskStatusRequest,
};
use super::websocket;
use crate::db::{
    Agent, AgentStats, AgentStatus, Context, ContextStats, ContextUpdate, DashboardStats, Database,
    NewAgent, NewContext, NewProject, NewTask, Project, ProjectStats, ProjectStatus, Task,
    TaskPriority, TaskStats, TaskStatus, TaskUpdate,
};
use crate::mcp;

/// Build routes with generic database type.
///
/// Applies the turbofish to every handler, which are all generic over
/// the Database trait.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agent Shaker API",
        version = "0.3.0",
        description = "Project and task tracker for coordinating coding agents",
        license(name = "MIT")
    ),
    paths(
        v1::health,
        v1::get_dashboard,
        v1::list_projects,
        v1::get_project,
        v1::create_project,
        v1::update_project_status,
        v1::delete_project,
        v1::list_agents,
        v1::get_agent,
        v1::create_agent,
        v1::update_agent_status,
        v1::delete_agent,
        v1::list_tasks,
        v1::get_task,
        v1::create_task,
        v1::update_task,
        v1::update_task_status,
        v1::delete_task,
        v1::list_contexts,
        v1::get_context,
        v1::create_context,
        v1::update_context,
        v1::delete_context,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            Project,
            ProjectStatus,
            NewProject,
            UpdateProjectStatusRequest,
            Agent,
            AgentStatus,
            NewAgent,
            UpdateAgentStatusRequest,
            Task,
            TaskStatus,
            TaskPriority,
            NewTask,
            TaskUpdate,
            UpdateTaskStatusRequest,
            Context,
            NewContext,
            ContextUpdate,
            DashboardStats,
            ProjectStats,
            AgentStats,
            TaskStats,
            ContextStats,
        )
    ),
    tags(
        (name = "system", description = "System health endpoints"),
        (name = "dashboard", description = "Aggregate statistics"),
        (name = "projects", description = "Project management endpoints"),
        (name = "agents", description = "Agent management endpoints"),
        (name = "tasks", description = "Task management endpoints"),
        (name = "contexts", description = "Shared context endpoints")
    )
)]
pub struct ApiDoc;

/// Create the full router: REST under `/api`, `/ws`, `/health`, `/docs`,
/// and the protocol endpoints at `/`, `/mcp`, and `/mcp/message`.
pub fn create_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let api = ApiDoc::openapi();

    let system_routes = Router::new()
        .route("/health", get(v1::health))
        .route("/ws", get(websocket::ws_handler::<D>));

    let api_routes = routes!(D => {
        get "/dashboard" => v1::get_dashboard,

        get "/projects" => v1::list_projects,
        post "/projects" => v1::create_project,
        get "/projects/{id}" => v1::get_project,
        delete "/projects/{id}" => v1::delete_project,
        put "/projects/{id}/status" => v1::update_project_status,

        get "/agents" => v1::list_agents,
        post "/agents" => v1::create_agent,
        get "/agents/{id}" => v1::get_agent,
        delete "/agents/{id}" => v1::delete_agent,
        put "/agents/{id}/status" => v1::update_agent_status,

        get "/tasks" => v1::list_tasks,
        post "/tasks" => v1::create_task,
        get "/tasks/{id}" => v1::get_task,
        put "/tasks/{id}" => v1::update_task,
        delete "/tasks/{id}" => v1::delete_task,
        put "/tasks/{id}/status" => v1::update_task_status,

        get "/contexts" => v1::list_contexts,
        post "/contexts" => v1::create_context,
        get "/contexts/{id}" => v1::get_context,
        put "/contexts/{id}" => v1::update_context,
        delete "/contexts/{id}" => v1::delete_context,
    });

    let protocol_routes = mcp::router(state.mcp());

    system_routes
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
        .merge(protocol_routes)
}
