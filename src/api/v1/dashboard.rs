//! Dashboard handler.

use axum::{Json, extract::State};
use tracing::instrument;

use super::{ApiResult, ErrorResponse, db_error};
use crate::api::AppState;
use crate::db::{Database, DashboardStats};

/// Aggregate counts
///
/// Totals and per-status breakdowns for projects, agents, tasks, and contexts
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard<D: Database>(
    State(state): State<AppState<D>>,
) -> ApiResult<Json<DashboardStats>> {
    let stats = state
        .db()
        .map_err(db_error)?
        .dashboard_stats()
        .await
        .map_err(db_error)?;

    Ok(Json(stats))
}
