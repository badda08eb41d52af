//! REST handlers under `/api`.

mod agents;
mod contexts;
mod dashboard;
mod projects;
mod system;
mod tasks;

#[cfg(test)]
mod agents_test;
#[cfg(test)]
mod projects_test;
#[cfg(test)]
pub(crate) mod test_support;

pub use agents::*;
pub use contexts::*;
pub use dashboard::*;
pub use projects::*;
pub use system::*;
pub use tasks::*;

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::db::DbError;

/// Error response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Entity not found: Project with id '7c9e6679-7425-40de-944b-e07fc1f90ae7'")]
    pub error: String,
}

/// Body of every `*_deleted` broadcast.
#[derive(Debug, Serialize)]
pub(crate) struct Deleted<'a> {
    pub id: &'a str,
}

pub(crate) type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

pub(crate) fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a store error onto an HTTP status.
pub(crate) fn db_error(e: DbError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        DbError::NotFound { .. } => StatusCode::NOT_FOUND,
        DbError::Validation { .. } => StatusCode::BAD_REQUEST,
        DbError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => {
            error!("Store error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, e.to_string())
}

/// Parse a status-like query or body value, reporting bad input as 400.
pub(crate) fn parse_enum<T>(raw: &str) -> ApiResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse()
        .map_err(|e: String| error_response(StatusCode::BAD_REQUEST, e))
}
