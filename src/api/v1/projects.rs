//! Project management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;

use super::{ApiResult, Deleted, ErrorResponse, db_error, parse_enum};
use crate::api::AppState;
use crate::db::{Database, NewProject, Project, ProjectRepository, ProjectStatus};
use crate::hub::EventTag;

/// Project status change request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProjectStatusRequest {
    /// New status (active, archived)
    #[schema(example = "archived")]
    pub status: String,
}

/// List all projects
///
/// Returns every project, newest first
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses(
        (status = 200, description = "List of projects", body = Vec<Project>),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_projects<D: Database>(
    State(state): State<AppState<D>>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state
        .db()
        .map_err(db_error)?
        .projects()
        .list()
        .await
        .map_err(db_error)?;

    Ok(Json(projects))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_project<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let project = state
        .db()
        .map_err(db_error)?
        .projects()
        .get(&id)
        .await
        .map_err(db_error)?;

    Ok(Json(project))
}

/// Create a new project
///
/// Creates a project in `active` state and announces it to subscribers of
/// the new project
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body = NewProject,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_project<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state
        .db()
        .map_err(db_error)?
        .projects()
        .create(&req)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&project.id, EventTag::ProjectCreated, &project);

    Ok((StatusCode::CREATED, Json(project)))
}

/// Change a project's status
#[utoipa::path(
    put,
    path = "/api/projects/{id}/status",
    tag = "projects",
    params(("id" = String, Path, description = "Project ID")),
    request_body = UpdateProjectStatusRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_project_status<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectStatusRequest>,
) -> ApiResult<Json<Project>> {
    let status: ProjectStatus = parse_enum(&req.status)?;

    let project = state
        .db()
        .map_err(db_error)?
        .projects()
        .update_status(&id, status)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&project.id, EventTag::ProjectUpdated, &project);

    Ok(Json(project))
}

/// Delete a project
///
/// Removes the project together with its agents, tasks, and contexts
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_project<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let project = state
        .db()
        .map_err(db_error)?
        .projects()
        .delete(&id)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&project.id, EventTag::ProjectDeleted, &Deleted { id: &project.id });

    Ok(StatusCode::NO_CONTENT)
}
