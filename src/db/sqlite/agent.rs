//! SQLite AgentRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{Agent, AgentQuery, AgentRepository, AgentStatus, DbError, DbResult, NewAgent};

const COLUMNS: &str = "id, project_id, name, role, team, status, last_seen, created_at";

/// SQLx-backed agent repository.
pub struct SqliteAgentRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn row_to_agent(row: &SqliteRow) -> Agent {
    let status: String = row.get("status");
    Agent {
        id: row.get("id"),
        project_id: row.get("project_id"),
        name: row.get("name"),
        role: row.get("role"),
        team: row.get("team"),
        status: status.parse().unwrap_or_default(),
        last_seen: row.get("last_seen"),
        created_at: row.get("created_at"),
    }
}

impl<'a> AgentRepository for SqliteAgentRepository<'a> {
    async fn create(&self, agent: &NewAgent) -> DbResult<Agent> {
        if agent.name.trim().is_empty() || agent.role.trim().is_empty() {
            return Err(DbError::Validation {
                message: "name and role are required".to_string(),
            });
        }

        let id = generate_entity_id();
        let now = current_timestamp();

        sqlx::query(
            "INSERT INTO agents (id, project_id, name, role, team, status, last_seen, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&agent.project_id)
        .bind(&agent.name)
        .bind(&agent.role)
        .bind(&agent.team)
        .bind(AgentStatus::Active.as_str())
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(Agent {
            id,
            project_id: agent.project_id.clone(),
            name: agent.name.clone(),
            role: agent.role.clone(),
            team: agent.team.clone(),
            status: AgentStatus::Active,
            last_seen: now.clone(),
            created_at: now,
        })
    }

    async fn get(&self, id: &str) -> DbResult<Agent> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM agents WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Agent", id))?;

        Ok(row_to_agent(&row))
    }

    async fn list(&self, query: &AgentQuery) -> DbResult<Vec<Agent>> {
        let rows = match query.project_id.as_deref().filter(|p| !p.is_empty()) {
            Some(project_id) => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM agents WHERE project_id = ? \
                     ORDER BY created_at DESC, rowid DESC"
                ))
                .bind(project_id)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM agents ORDER BY created_at DESC, rowid DESC"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(row_to_agent).collect())
    }

    async fn update_status(&self, id: &str, status: AgentStatus) -> DbResult<Agent> {
        let result = sqlx::query("UPDATE agents SET status = ?, last_seen = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(current_timestamp())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Agent", id));
        }

        self.get(id).await
    }

    async fn delete(&self, id: &str) -> DbResult<Agent> {
        let agent = self.get(id).await?;

        sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(agent)
    }
}
