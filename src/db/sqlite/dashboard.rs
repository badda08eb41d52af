//! Aggregate counts for the dashboard.

use sqlx::{Row, SqlitePool};

use crate::db::{AgentStats, ContextStats, DashboardStats, DbResult, ProjectStats, TaskStats};

pub(crate) async fn load_stats(pool: &SqlitePool) -> DbResult<DashboardStats> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS total, \
         COALESCE(SUM(status = 'active'), 0) AS active, \
         COALESCE(SUM(status = 'archived'), 0) AS archived \
         FROM projects",
    )
    .fetch_one(pool)
    .await?;
    let projects = ProjectStats {
        total: row.get("total"),
        active: row.get("active"),
        archived: row.get("archived"),
    };

    let row = sqlx::query(
        "SELECT COUNT(*) AS total, \
         COALESCE(SUM(status = 'active'), 0) AS active, \
         COALESCE(SUM(status = 'idle'), 0) AS idle, \
         COALESCE(SUM(status = 'offline'), 0) AS offline \
         FROM agents",
    )
    .fetch_one(pool)
    .await?;
    let agents = AgentStats {
        total: row.get("total"),
        active: row.get("active"),
        idle: row.get("idle"),
        offline: row.get("offline"),
    };

    let row = sqlx::query(
        "SELECT COUNT(*) AS total, \
         COALESCE(SUM(status = 'pending'), 0) AS pending, \
         COALESCE(SUM(status = 'in_progress'), 0) AS in_progress, \
         COALESCE(SUM(status = 'done'), 0) AS done, \
         COALESCE(SUM(status = 'blocked'), 0) AS blocked \
         FROM tasks",
    )
    .fetch_one(pool)
    .await?;
    let tasks = TaskStats {
        total: row.get("total"),
        pending: row.get("pending"),
        in_progress: row.get("in_progress"),
        done: row.get("done"),
        blocked: row.get("blocked"),
    };

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contexts")
        .fetch_one(pool)
        .await?;

    Ok(DashboardStats {
        projects,
        agents,
        tasks,
        contexts: ContextStats { total },
    })
}
