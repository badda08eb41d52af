//! Agent Shaker server binary.
//!
//! Opens the concrete SQLite store and hands it to the server. The server
//! itself is agnostic of the storage backend.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use agent_shaker::api::{self, ApiError, Config};
use agent_shaker::db::{Database, DbError, SqliteDatabase};
use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(agent_shaker::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(agent_shaker::binary::io))]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    #[diagnostic(code(agent_shaker::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "agent-shaker")]
#[command(author, version, about = "Project and task tracker for coding agents", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on [env: PORT, default: 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// Database file path [env: AGENT_SHAKER_DB, default: ~/.local/share/agent-shaker/tracker.db]
    #[arg(long)]
    db: Option<PathBuf>,

    /// Seconds between keep-alive pings on event streams [env: AGENT_SHAKER_KEEPALIVE_SECS]
    #[arg(long)]
    keep_alive_secs: Option<u64>,

    /// Outbound queue size per live connection [env: AGENT_SHAKER_QUEUE_CAPACITY]
    #[arg(long)]
    queue_capacity: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new();
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(db) = self.db {
            config = config.with_db_path(db);
        }
        if let Some(secs) = self.keep_alive_secs.filter(|s| *s > 0) {
            config = config.with_keep_alive(Duration::from_secs(secs));
        }
        if let Some(capacity) = self.queue_capacity {
            config = config.with_queue_capacity(capacity);
        }
        config
    }
}

async fn open_store(path: &Path) -> Result<SqliteDatabase, BinaryError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(path).await?;
    db.migrate().await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    api::init_tracing();

    let config = Cli::parse().into_config();

    info!("Opening database at {:?}", config.db_path);
    let db = match open_store(&config.db_path).await {
        Ok(db) => {
            info!("Database migrations complete");
            Some(Arc::new(db))
        }
        Err(e) => {
            warn!("Failed to open database: {}", e);
            warn!("Starting without a database; data operations will report it unavailable");
            None
        }
    };

    api::run(config, db).await?;

    Ok(())
}
