//! SQLite TaskRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{
    DbError, DbResult, NewTask, Task, TaskQuery, TaskRepository, TaskStatus, TaskUpdate,
};

const COLUMNS: &str = "id, project_id, title, description, status, priority, created_by, \
                       assigned_to, output, created_at, updated_at";

/// SQLx-backed task repository.
pub struct SqliteTaskRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn row_to_task(row: &SqliteRow) -> Task {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    Task {
        id: row.get("id"),
        project_id: row.get("project_id"),
        title: row.get("title"),
        description: row.get("description"),
        status: status.parse().unwrap_or_default(),
        priority: priority.parse().unwrap_or_default(),
        created_by: row.get("created_by"),
        assigned_to: row.get("assigned_to"),
        output: row.get("output"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<'a> TaskRepository for SqliteTaskRepository<'a> {
    async fn create(&self, task: &NewTask) -> DbResult<Task> {
        if task.title.trim().is_empty() {
            return Err(DbError::Validation {
                message: "title is required".to_string(),
            });
        }

        let id = generate_entity_id();
        let now = current_timestamp();

        sqlx::query(
            "INSERT INTO tasks (id, project_id, title, description, status, priority, \
             created_by, assigned_to, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(TaskStatus::Pending.as_str())
        .bind(task.priority.as_str())
        .bind(&task.created_by)
        .bind(&task.assigned_to)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(Task {
            id,
            project_id: task.project_id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: TaskStatus::Pending,
            priority: task.priority,
            created_by: task.created_by.clone(),
            assigned_to: task.assigned_to.clone(),
            output: None,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn get(&self, id: &str) -> DbResult<Task> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Task", id))?;

        Ok(row_to_task(&row))
    }

    async fn list(&self, query: &TaskQuery) -> DbResult<Vec<Task>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut bind_values: Vec<String> = Vec::new();

        if let Some(project_id) = query.project_id.as_ref().filter(|p| !p.is_empty()) {
            conditions.push("project_id = ?");
            bind_values.push(project_id.clone());
        }
        if let Some(agent_id) = query.agent_id.as_ref().filter(|a| !a.is_empty()) {
            conditions.push("assigned_to = ?");
            bind_values.push(agent_id.clone());
        }
        if let Some(status) = query.status {
            conditions.push("status = ?");
            bind_values.push(status.to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql =
            format!("SELECT {COLUMNS} FROM tasks {where_clause} ORDER BY created_at DESC, rowid DESC");

        let mut sql_query = sqlx::query(&sql);
        for value in &bind_values {
            sql_query = sql_query.bind(value);
        }

        let rows = sql_query.fetch_all(self.pool).await?;
        Ok(rows.iter().map(row_to_task).collect())
    }

    async fn update(&self, id: &str, update: &TaskUpdate) -> DbResult<Task> {
        let mut task = self.get(id).await?;

        if let Some(title) = &update.title {
            task.title = title.clone();
        }
        if let Some(description) = &update.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = &update.assigned_to {
            // Empty string unassigns.
            task.assigned_to = Some(assigned_to.clone()).filter(|a| !a.is_empty());
        }
        if let Some(output) = &update.output {
            task.output = Some(output.clone());
        }
        task.updated_at = current_timestamp();

        sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, status = ?, priority = ?, \
             assigned_to = ?, output = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(&task.assigned_to)
        .bind(&task.output)
        .bind(&task.updated_at)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(task)
    }

    async fn update_status(&self, id: &str, status: TaskStatus) -> DbResult<Task> {
        let result = sqlx::query("UPDATE tasks SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(current_timestamp())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }

        self.get(id).await
    }

    async fn delete(&self, id: &str) -> DbResult<Task> {
        let task = self.get(id).await?;

        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(task)
    }
}

