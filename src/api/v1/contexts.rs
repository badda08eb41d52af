//! Shared context (documentation) handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use super::{ApiResult, Deleted, ErrorResponse, db_error, error_response};
use crate::api::AppState;
use crate::db::{Context, ContextQuery, ContextRepository, ContextUpdate, Database, NewContext};
use crate::hub::EventTag;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListContextsQuery {
    /// Project whose contexts to list (required)
    pub project_id: Option<String>,
    /// Comma-separated tags; a context matches if it carries any of them
    #[param(example = "api,design")]
    pub tags: Option<String>,
}

/// Split `a, b,,c` into `["a", "b", "c"]`.
pub(crate) fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// List contexts of a project
#[utoipa::path(
    get,
    path = "/api/contexts",
    tag = "contexts",
    params(ListContextsQuery),
    responses(
        (status = 200, description = "List of contexts", body = Vec<Context>),
        (status = 400, description = "Missing project_id", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_contexts<D: Database>(
    State(state): State<AppState<D>>,
    Query(query): Query<ListContextsQuery>,
) -> ApiResult<Json<Vec<Context>>> {
    let project_id = query
        .project_id
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "project_id query parameter is required",
            )
        })?;

    let query = ContextQuery {
        project_id: Some(project_id),
        tags: split_tags(query.tags.as_deref()),
    };

    let contexts = state
        .db()
        .map_err(db_error)?
        .contexts()
        .list(&query)
        .await
        .map_err(db_error)?;

    Ok(Json(contexts))
}

/// Get a context by ID
#[utoipa::path(
    get,
    path = "/api/contexts/{id}",
    tag = "contexts",
    params(("id" = String, Path, description = "Context ID")),
    responses(
        (status = 200, description = "Context found", body = Context),
        (status = 404, description = "Context not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_context<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Context>> {
    let context = state
        .db()
        .map_err(db_error)?
        .contexts()
        .get(&id)
        .await
        .map_err(db_error)?;

    Ok(Json(context))
}

/// Add a context to a project
#[utoipa::path(
    post,
    path = "/api/contexts",
    tag = "contexts",
    request_body = NewContext,
    responses(
        (status = 201, description = "Context created", body = Context),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_context<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<NewContext>,
) -> ApiResult<(StatusCode, Json<Context>)> {
    let context = state
        .db()
        .map_err(db_error)?
        .contexts()
        .create(&req)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&context.project_id, EventTag::ContextAdded, &context);

    Ok((StatusCode::CREATED, Json(context)))
}

/// Replace a context's title, content, tags, and task link
#[utoipa::path(
    put,
    path = "/api/contexts/{id}",
    tag = "contexts",
    params(("id" = String, Path, description = "Context ID")),
    request_body = ContextUpdate,
    responses(
        (status = 200, description = "Context updated", body = Context),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Context not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_context<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<ContextUpdate>,
) -> ApiResult<Json<Context>> {
    if req.title.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "title is required"));
    }

    let context = state
        .db()
        .map_err(db_error)?
        .contexts()
        .update(&id, &req)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&context.project_id, EventTag::ContextUpdated, &context);

    Ok(Json(context))
}

/// Delete a context
#[utoipa::path(
    delete,
    path = "/api/contexts/{id}",
    tag = "contexts",
    params(("id" = String, Path, description = "Context ID")),
    responses(
        (status = 204, description = "Context deleted"),
        (status = 404, description = "Context not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_context<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let context = state
        .db()
        .map_err(db_error)?
        .contexts()
        .delete(&id)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(
        &context.project_id,
        EventTag::ContextDeleted,
        &Deleted { id: &context.id },
    );

    Ok(StatusCode::NO_CONTENT)
}
