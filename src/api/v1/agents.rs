//! Agent management handlers.

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
use crate::db::{Agent, AgentQuery, AgentRepository, AgentStatus, Database, NewAgent};
use crate::hub::EventTag;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAgentsQuery {
    /// Only agents of this project
    pub project_id: Option<String>,
}

/// Agent status change request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAgentStatusRequest {
    /// New status (active, idle, offline)
    #[schema(example = "idle")]
    pub status: String,
}

/// List agents
#[utoipa::path(
    get,
    path = "/api/agents",
    tag = "agents",
    params(ListAgentsQuery),
    responses(
        (status = 200, description = "List of agents", body = Vec<Agent>),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_agents<D: Database>(
    State(state): State<AppState<D>>,
    Query(query): Query<ListAgentsQuery>,
) -> ApiResult<Json<Vec<Agent>>> {
    let query = AgentQuery {
        project_id: query.project_id,
    };

    let agents = state
        .db()
        .map_err(db_error)?
        .agents()
        .list(&query)
        .await
        .map_err(db_error)?;

    Ok(Json(agents))
}

/// Get an agent by ID
#[utoipa::path(
    get,
    path = "/api/agents/{id}",
    tag = "agents",
    params(("id" = String, Path, description = "Agent ID")),
    responses(
        (status = 200, description = "Agent found", body = Agent),
        (status = 404, description = "Agent not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_agent<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Agent>> {
    let agent = state
        .db()
        .map_err(db_error)?
        .agents()
        .get(&id)
        .await
        .map_err(db_error)?;

    Ok(Json(agent))
}

/// Register an agent with a project
#[utoipa::path(
    post,
    path = "/api/agents",
    tag = "agents",
    request_body = NewAgent,
    responses(
        (status = 201, description = "Agent created", body = Agent),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_agent<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<NewAgent>,
) -> ApiResult<(StatusCode, Json<Agent>)> {
    let agent = state
        .db()
        .map_err(db_error)?
        .agents()
        .create(&req)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&agent.project_id, EventTag::AgentCreated, &agent);

    Ok((StatusCode::CREATED, Json(agent)))
}

/// Change an agent's status
///
/// Also refreshes the agent's `last_seen` timestamp
#[utoipa::path(
    put,
    path = "/api/agents/{id}/status",
    tag = "agents",
    params(("id" = String, Path, description = "Agent ID")),
    request_body = UpdateAgentStatusRequest,
    responses(
        (status = 200, description = "Agent updated", body = Agent),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 404, description = "Agent not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_agent_status<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAgentStatusRequest>,
) -> ApiResult<Json<Agent>> {
    let status: AgentStatus = parse_enum(&req.status)?;

    let agent = state
        .db()
        .map_err(db_error)?
        .agents()
        .update_status(&id, status)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&agent.project_id, EventTag::AgentUpdated, &agent);

    Ok(Json(agent))
}

/// Delete an agent
#[utoipa::path(
    delete,
    path = "/api/agents/{id}",
    tag = "agents",
    params(("id" = String, Path, description = "Agent ID")),
    responses(
        (status = 204, description = "Agent deleted"),
        (status = 404, description = "Agent not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_agent<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let agent = state
        .db()
        .map_err(db_error)?
        .agents()
        .delete(&id)
        .await
        .map_err(db_error)?;

    state.hub().broadcast(&agent.project_id, EventTag::AgentDeleted, &Deleted { id: &agent.id });

    Ok(StatusCode::NO_CONTENT)
}
