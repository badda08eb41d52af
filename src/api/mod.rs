//! HTTP server: REST handlers, the live update socket, and the protocol
//! endpoints, all on one listener.

mod routes;
mod state;
pub mod v1;
mod websocket;


use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
use crate::hub;

pub use routes::{ApiDoc, create_router};
pub use state::AppState;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);
const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// API server errors
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind to {addr}: {source}")]
    #[diagnostic(code(agent_shaker::api::bind_error))]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(agent_shaker::api::server_error))]
    Serve(#[source] std::io::Error),
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SQLite database file
    pub db_path: PathBuf,
    /// Interval between `:ping` comments on open event streams
    pub keep_alive: Duration,
    /// Outbound queue size of each live update connection
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            db_path: default_db_path(),
            keep_alive: DEFAULT_KEEP_ALIVE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Config {
    /// Defaults overridden by `PORT`, `AGENT_SHAKER_DB`,
    /// `AGENT_SHAKER_KEEPALIVE_SECS` and `AGENT_SHAKER_QUEUE_CAPACITY`.
    ///
    /// Values that fail to parse are ignored.
    pub fn new() -> Self {
        let defaults = Self::default();
        Self {
            host: defaults.host,
            port: env_parse("PORT").unwrap_or(defaults.port),
            db_path: env::var("AGENT_SHAKER_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            keep_alive: env_parse("AGENT_SHAKER_KEEPALIVE_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.keep_alive),
            queue_capacity: env_parse("AGENT_SHAKER_QUEUE_CAPACITY")
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.queue_capacity),
        }
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_db_path(mut self, db_path: PathBuf) -> Self {
        self.db_path = db_path;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity.max(1);
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment variable");
            None
        }
    }
}

/// `$XDG_DATA_HOME/agent-shaker/tracker.db`, falling back to
/// `~/.local/share/agent-shaker/tracker.db`.
pub fn default_db_path() -> PathBuf {
    let data_home = env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::var("HOME")
                .map(|home| PathBuf::from(home).join(".local/share"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });

    data_home.join("agent-shaker").join("tracker.db")
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_shaker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the server until Ctrl-C.
///
/// `db` is `None` when the store could not be opened; every data
/// operation then reports the store as unavailable.
pub async fn run<D: Database + 'static>(
    config: Config,
    db: Option<Arc<D>>,
) -> Result<(), ApiError> {
    let shutdown = CancellationToken::new();
    let (hub, hub_task) = hub::spawn(shutdown.clone());

    let state = AppState::new(db, hub, &config, shutdown.clone());
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;

    info!("Server listening on http://{}", addr);
    info!("  Protocol:   http://{}/ and http://{}/mcp", addr, addr);
    info!("  REST:       http://{}/api", addr);
    info!("  Live:       ws://{}/ws", addr);
    info!("  Docs:       http://{}/docs", addr);

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    signal.cancel();
                }
                _ = signal.cancelled() => {}
            }
        })
        .await
        .map_err(ApiError::Serve)?;

    shutdown.cancel();
    if let Err(e) = hub_task.await {
        warn!("Hub task ended abnormally: {}", e);
    }

    info!("Server stopped");
    Ok(())
}
