//! Task management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{ApiResult, Deleted, ErrorResponse, db_error, parse_enum};
use crate::api::AppState;
use crate::db::{Database, NewTask, Task, TaskQuery, TaskRepository, TaskStatus, TaskUpdate};
use crate::hub::EventTag;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTasksQuery {
    /// Only tasks of this project
    pub project_id: Option<String>,
    /// Only tasks assigned to this agent
    pub agent_id: Option<String>,
    /// Only tasks in this status (pending, in_progress, done, blocked)
    #[param(example = "pending")]
    pub status: Option<String>,
}

/// Task status change request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskStatusRequest {
    /// New status (pending, in_progress, done, blocked)
    #[schema(example = "in_progress")]
    pub status: String,
}

/// List tasks
///
/// All filters are optional and combined with AND
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "List of tasks", body = Vec<Task>),
        (status = 400, description = "Invalid status filter", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_tasks<D: Database>(
    State(state): State<AppState<D>>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_enum::<TaskStatus>(raw)?),
        None => None,
    };

    let query = TaskQuery {
        project_id: query.project_id,
        agent_id: query.agent_id,
        status,
    };

    let tasks = state
        .db()
        .map_err(db_error)?
        .tasks()
        .list(&query)
        .await
        .map_err(db_error)?;

    Ok(Json(tasks))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_task<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task = state
        .db()
        .map_err(db_error)?
        .tasks()
        .get(&id)
        .await
        .map_err(db_error)?;

    Ok(Json(task))
}

/// Create a new task
///
/// New tasks start in `pending`
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_task<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state
        .db()
        .map_err(db_error)?
        .tasks()
        .create(&req)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&task.project_id, EventTag::TaskCreated, &task);

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task
///
/// Only the fields present in the body are changed. An empty
/// `assigned_to` unassigns the task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    request_body = TaskUpdate,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_task<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<TaskUpdate>,
) -> ApiResult<Json<Task>> {
    let task = state
        .db()
        .map_err(db_error)?
        .tasks()
        .update(&id, &req)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&task.project_id, EventTag::TaskUpdated, &task);

    Ok(Json(task))
}

/// Change a task's status
#[utoipa::path(
    put,
    path = "/api/tasks/{id}/status",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_task_status<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> ApiResult<Json<Task>> {
    let status: TaskStatus = parse_enum(&req.status)?;

    let task = state
        .db()
        .map_err(db_error)?
        .tasks()
        .update_status(&id, status)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&task.project_id, EventTag::TaskUpdated, &task);

    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_task<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let task = state
        .db()
        .map_err(db_error)?
        .tasks()
        .delete(&id)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&task.project_id, EventTag::TaskDeleted, &Deleted { id: &task.id });

    Ok(StatusCode::NO_CONTENT)
}
