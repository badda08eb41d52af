//! WebSocket handler for live project updates.
//!
//! A socket joins the hub once it names a project, either with
//! `?project_id=` on the upgrade request or with a
//! `{"type":"subscribe","project_id":"..."}` frame. Events for every
//! subscribed project are forwarded as text frames.

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::state::AppState;
use crate::db::Database;
use crate::hub::Connection;

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    pub project_id: Option<String>,
}

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ClientMessage {
    Subscribe { project_id: String },
    Ping,
}

/// Control frames sent back to the client. Hub events use their own shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ServerMessage {
    Subscribed { project_id: String },
    Pong,
    Error { message: String },
}

impl ServerMessage {
    fn to_frame(&self) -> Option<Message> {
        match serde_json::to_string(self) {
            Ok(json) => Some(Message::Text(json.into())),
            Err(e) => {
                error!("Failed to serialize control frame: {}", e);
                None
            }
        }
    }
}

/// Turn one inbound text frame into a reply, subscribing if asked.
pub(crate) fn interpret(text: &str) -> Result<ClientMessage, ServerMessage> {
    let message: ClientMessage = serde_json::from_str(text).map_err(|e| ServerMessage::Error {
        message: format!("unrecognised message: {}", e),
    })?;

    match message {
        ClientMessage::Subscribe { project_id } => match project_key(&project_id) {
            Some(project_id) => Ok(ClientMessage::Subscribe { project_id }),
            None => Err(ServerMessage::Error {
                message: "project_id is required".to_string(),
            }),
        },
        other => Ok(other),
    }
}

/// Trimmed project id, or `None` when nothing is left.
pub(crate) fn project_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// WebSocket upgrade handler.
pub async fn ws_handler<D: Database + 'static>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<D>>,
    Query(query): Query<WsQuery>,
) -> impl IntoResponse {
    let project_id = query.project_id.as_deref().and_then(project_key);
    ws.on_upgrade(move |socket| handle_socket(socket, state, project_id))
}

/// Pump hub events out and client control frames in until either side
/// goes away.
async fn handle_socket<D: Database>(
    mut socket: WebSocket,
    state: AppState<D>,
    project_id: Option<String>,
) {
    let hub = state.hub().clone();
    let shutdown = state.shutdown().clone();
    let (connection, mut rx) = Connection::new(state.queue_capacity());
    let closed = connection.closed();

    info!(connection_id = %connection.id(), "WebSocket client connected");

    if let Some(project_id) = project_id {
        hub.register(&connection, &project_id);
    }

    loop {
        tokio::select! {
            _ = closed.cancelled() => {
                warn!(connection_id = %connection.id(), "Connection dropped by hub");
                break;
            }

            _ = shutdown.cancelled() => break,

            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!(
                            connection_id = %connection.id(),
                            "Received from client: {}",
                            text.as_str()
                        );
                        let reply = match interpret(text.as_str()) {
                            Ok(ClientMessage::Subscribe { project_id }) => {
                                hub.register(&connection, &project_id);
                                ServerMessage::Subscribed { project_id }
                            }
                            Ok(ClientMessage::Ping) => ServerMessage::Pong,
                            Err(reply) => reply,
                        };
                        if let Some(frame) = reply.to_frame() {
                            if socket.send(frame).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(connection_id = %connection.id(), "Client closed connection");
                        break;
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }

            frame = rx.recv() => {
                let Some(frame) = frame else { break };
                if let Err(e) = socket.send(Message::Text(frame.into())).await {
                    error!("Failed to send update: {}", e);
                    break;
                }
            }
        }
    }

    hub.unregister(connection.id());
    info!(connection_id = %connection.id(), "WebSocket client disconnected");
}
