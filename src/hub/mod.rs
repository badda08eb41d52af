//! Broadcast hub: project-scoped fan-out of tracker mutations to live
//! connections.
//!
//! A single task owns the connection registry. Everything else talks to
//! it through a [`HubHandle`], so registration changes and deliveries are
//! applied in the order they were requested.

mod connection;
mod event;
mod registry;


pub use connection::{Connection, ConnectionId};
pub use event::{Event, EventTag};

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use registry::Registry;

enum Command {
    Register {
        connection: Connection,
        project_id: String,
    },
    Unregister {
        id: ConnectionId,
    },
    Broadcast {
        project_id: String,
        tag: EventTag,
        frame: String,
    },
    SubscriberCount {
        project_id: String,
        reply: oneshot::Sender<usize>,
    },
    ConnectionCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Cloneable entry point to the hub loop.
///
/// Calls never block. Once the loop has stopped they are silently ignored
/// and the count queries report zero.
#[derive(Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl HubHandle {
    /// Subscribe `connection` to `project_id`. Idempotent per pair.
    pub fn register(&self, connection: &Connection, project_id: &str) {
        if project_id.is_empty() {
            warn!(conn_id = %connection.id(), "ignoring subscribe without project id");
            return;
        }
        self.send(Command::Register {
            connection: connection.clone(),
            project_id: project_id.to_string(),
        });
    }

    /// Remove a connection from every project. Safe to repeat.
    pub fn unregister(&self, id: ConnectionId) {
        self.send(Command::Unregister { id });
    }

    /// Fan out `{type: tag, payload}` to every connection subscribed to
    /// `project_id`.
    pub fn broadcast<T: Serialize>(&self, project_id: &str, tag: EventTag, payload: &T) {
        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(%tag, project_id, error = %e, "failed to serialize event payload");
                return;
            }
        };
        let event = Event::new(project_id, tag, payload);
        let frame = match serde_json::to_string(&event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(%tag, project_id, error = %e, "failed to serialize event");
                return;
            }
        };
        self.send(Command::Broadcast {
            project_id: event.project_id,
            tag,
            frame,
        });
    }

    /// Number of connections subscribed to `project_id`.
    pub async fn subscriber_count(&self, project_id: &str) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SubscriberCount {
            project_id: project_id.to_string(),
            reply,
        });
        rx.await.unwrap_or(0)
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ConnectionCount { reply });
        rx.await.unwrap_or(0)
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("hub stopped, dropping command");
        }
    }
}

/// Start the hub loop. It runs until `shutdown` is cancelled, then closes
/// every registered connection.
pub fn spawn(shutdown: CancellationToken) -> (HubHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(rx, shutdown));
    (HubHandle { commands: tx }, task)
}

async fn run(mut commands: mpsc::UnboundedReceiver<Command>, shutdown: CancellationToken) {
    let mut registry = Registry::default();
    info!("broadcast hub started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            command = commands.recv() => match command {
                Some(command) => apply(&mut registry, command),
                None => break,
            },
        }
    }

    registry.clear();
    info!("broadcast hub stopped");
}

fn apply(registry: &mut Registry, command: Command) {
    match command {
        Command::Register {
            connection,
            project_id,
        } => {
            let conn_id = connection.id();
            if registry.register(connection, &project_id) {
                debug!(%conn_id, %project_id, "connection subscribed");
            }
        }
        Command::Unregister { id } => {
            if registry.unregister(id) {
                debug!(conn_id = %id, "connection unregistered");
            }
        }
        Command::Broadcast {
            project_id,
            tag,
            frame,
        } => {
            let delivery = registry.broadcast(&project_id, &frame);
            debug!(
                %tag,
                %project_id,
                recipients = delivery.delivered,
                dropped = delivery.dropped,
                "broadcast event to project"
            );
            if delivery.dropped > 0 {
                warn!(
                    %project_id,
                    dropped = delivery.dropped,
                    "dropped unresponsive connections"
                );
            }
        }
        Command::SubscriberCount { project_id, reply } => {
            let _ = reply.send(registry.subscriber_count(&project_id));
        }
        Command::ConnectionCount { reply } => {
            let _ = reply.send(registry.connection_count());
        }
    }
}
