//! SQLite ProjectRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{DbError, DbResult, NewProject, Project, ProjectRepository, ProjectStatus};

const COLUMNS: &str = "id, name, description, status, created_at, updated_at";

/// SQLx-backed project repository.
pub struct SqliteProjectRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn row_to_project(row: &SqliteRow) -> Project {
    let status: String = row.get("status");
    Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        status: status.parse().unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<'a> ProjectRepository for SqliteProjectRepository<'a> {
    async fn create(&self, project: &NewProject) -> DbResult<Project> {
        if project.name.trim().is_empty() {
            return Err(DbError::Validation {
                message: "name is required".to_string(),
            });
        }

        let id = generate_entity_id();
        let now = current_timestamp();

        sqlx::query(
            "INSERT INTO projects (id, name, description, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(ProjectStatus::Active.as_str())
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(Project {
            id,
            name: project.name.clone(),
            description: project.description.clone(),
            status: ProjectStatus::Active,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn get(&self, id: &str) -> DbResult<Project> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM projects WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Project", id))?;

        Ok(row_to_project(&row))
    }

    async fn list(&self) -> DbResult<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(row_to_project).collect())
    }

    async fn update_status(&self, id: &str, status: ProjectStatus) -> DbResult<Project> {
        let result = sqlx::query("UPDATE projects SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(current_timestamp())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Project", id));
        }

        self.get(id).await
    }

    async fn delete(&self, id: &str) -> DbResult<Project> {
        let project = self.get(id).await?;

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(project)
    }
}
