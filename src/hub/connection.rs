//! Live duplex client connections as seen by the hub.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Opaque connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The hub's side of a client connection: a bounded outbound queue and a
/// token the hub cancels when it drops the connection.
///
/// The transport keeps the matching receiver and watches [`Connection::closed`].
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::Sender<String>,
    closed: CancellationToken,
}

impl Connection {
    /// Create a connection whose outbound queue holds `capacity` frames.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let connection = Self {
            id: ConnectionId::new(),
            tx,
            closed: CancellationToken::new(),
        };
        (connection, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Cancelled once the hub has removed this connection.
    pub fn closed(&self) -> CancellationToken {
        self.closed.clone()
    }

    /// Non-blocking enqueue. `false` means the queue is full or the
    /// receiver is gone.
    pub(crate) fn try_deliver(&self, frame: String) -> bool {
        self.tx.try_send(frame).is_ok()
    }

    pub(crate) fn close(&self) {
        self.closed.cancel();
    }
}
