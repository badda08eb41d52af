//! Dashboard tool.

use std::sync::Arc;

use crate::db::{DashboardSummary, Database};
use crate::mcp::protocol::ToolOutcome;

use super::{connected, respond};

pub struct DashboardTools<D: Database> {
    db: Option<Arc<D>>,
}

impl<D: Database> DashboardTools<D> {
    pub fn new(db: Option<Arc<D>>) -> Self {
        Self { db }
    }

    /// Flat collection and task-status counts.
    pub async fn get_dashboard(&self) -> ToolOutcome {
        let db = match connected(&self.db) {
            Ok(db) => db,
            Err(outcome) => return outcome,
        };
        respond(db.dashboard_stats().await.map(DashboardSummary::from))
    }
}
