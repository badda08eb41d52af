//! HTTP surface of the protocol: stateless request/response, discovery,
//! and the long-lived event stream.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Version, header},
    response::{
        IntoResponse, Response,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
    routing::{MethodRouter, get, post},
};
use futures_util::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::db::Database;

use super::dispatcher::{Dispatcher, server_info};
use super::session::SessionStore;

pub const MESSAGE_PATH: &str = "/mcp/message";

/// Everything the protocol handlers need.
pub struct McpState<D: Database> {
    pub dispatcher: Arc<Dispatcher<D>>,
    pub sessions: SessionStore,
    pub keep_alive: Duration,
    pub shutdown: CancellationToken,
}

impl<D: Database> Clone for McpState<D> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            sessions: self.sessions.clone(),
            keep_alive: self.keep_alive,
            shutdown: self.shutdown.clone(),
        }
    }
}

/// Wildcard origin, `GET, POST, OPTIONS`, `Content-Type, Accept`.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Protocol routes with their state applied.
pub fn router<D: Database + 'static>(state: McpState<D>) -> Router {
    let entry = || -> MethodRouter<McpState<D>> {
        get(handle_get::<D>)
            .post(handle_post::<D>)
            .options(preflight)
    };

    Router::new()
        .route("/", entry())
        .route("/mcp", entry())
        .route(
            MESSAGE_PATH,
            post(handle_session_message::<D>).options(preflight),
        )
        .layer(cors())
        .with_state(state)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/event-stream"))
}

async fn handle_get<D: Database + 'static>(
    State(state): State<McpState<D>>,
    version: Version,
    headers: HeaderMap,
) -> Response {
    if wants_event_stream(&headers) {
        return open_stream(&state, version, &headers);
    }
    Json(server_info()).into_response()
}

async fn handle_post<D: Database + 'static>(
    State(state): State<McpState<D>>,
    body: Bytes,
) -> Response {
    dispatch(&state, &body).await
}

#[derive(Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Requests correlated with an open event stream.
async fn handle_session_message<D: Database + 'static>(
    State(state): State<McpState<D>>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    if let Some(session_id) = &query.session_id {
        if !state.sessions.contains(session_id) {
            debug!(%session_id, "message for unknown session");
            return (StatusCode::NOT_FOUND, "Session not found").into_response();
        }
    }
    dispatch(&state, &body).await
}

async fn dispatch<D: Database + 'static>(state: &McpState<D>, body: &[u8]) -> Response {
    match state.dispatcher.handle_raw(body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Open a session and hold it for as long as the client keeps reading.
///
/// The first frame names the endpoint for follow-up requests. After that
/// only keep-alive comments are sent. The session closes when the client
/// goes away (the stream is dropped) or the server shuts down.
fn open_stream<D: Database>(
    state: &McpState<D>,
    version: Version,
    headers: &HeaderMap,
) -> Response {
    if version < Version::HTTP_11 {
        warn!(?version, "event stream requested over a transport without streaming");
        return (StatusCode::INTERNAL_SERVER_ERROR, "SSE not supported").into_response();
    }

    let client_info = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|agent| json!({ "userAgent": agent }));
    let guard = state.sessions.open(client_info);
    let endpoint = format!("{MESSAGE_PATH}?sessionId={}", guard.id());

    let shutdown = state.shutdown.clone();
    let hello = stream::once(async move {
        Ok::<_, Infallible>(SseEvent::default().event("endpoint").data(endpoint))
    });
    let hold = stream::once(async move {
        shutdown.cancelled().await;
        info!(session_id = %guard.id(), "closing event stream for shutdown");
        drop(guard);
    })
    .filter_map(|()| async { None::<Result<SseEvent, Infallible>> });

    Sse::new(hello.chain(hold))
        .keep_alive(KeepAlive::new().interval(state.keep_alive).text("ping"))
        .into_response()
}
