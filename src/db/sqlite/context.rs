//! SQLite ContextRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{
    Context, ContextQuery, ContextRepository, ContextUpdate, DbError, DbResult, NewContext,
};

const COLUMNS: &str = "c.id, c.project_id, c.agent_id, c.task_id, c.title, c.content, c.tags, \
                       c.created_at, c.updated_at";

/// SQLx-backed context repository.
pub struct SqliteContextRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn row_to_context(row: &SqliteRow) -> Context {
    let tags_json: String = row.get("tags");
    Context {
        id: row.get("id"),
        project_id: row.get("project_id"),
        agent_id: row.get("agent_id"),
        task_id: row.get("task_id"),
        title: row.get("title"),
        content: row.get("content"),
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn tags_to_json(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

impl<'a> ContextRepository for SqliteContextRepository<'a> {
    async fn create(&self, context: &NewContext) -> DbResult<Context> {
        if context.title.trim().is_empty() {
            return Err(DbError::Validation {
                message: "title is required".to_string(),
            });
        }

        let id = generate_entity_id();
        let now = current_timestamp();

        sqlx::query(
            "INSERT INTO contexts (id, project_id, agent_id, task_id, title, content, tags, \
             created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&context.project_id)
        .bind(&context.agent_id)
        .bind(&context.task_id)
        .bind(&context.title)
        .bind(&context.content)
        .bind(tags_to_json(&context.tags))
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(Context {
            id,
            project_id: context.project_id.clone(),
            agent_id: context.agent_id.clone(),
            task_id: context.task_id.clone(),
            title: context.title.clone(),
            content: context.content.clone(),
            tags: context.tags.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn get(&self, id: &str) -> DbResult<Context> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM contexts c WHERE c.id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Context", id))?;

        Ok(row_to_context(&row))
    }

    async fn list(&self, query: &ContextQuery) -> DbResult<Vec<Context>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_values: Vec<String> = Vec::new();

        if let Some(project_id) = query.project_id.as_ref().filter(|p| !p.is_empty()) {
            conditions.push("c.project_id = ?".to_string());
            bind_values.push(project_id.clone());
        }

        // Tag overlap: match if ANY requested tag is present.
        if !query.tags.is_empty() {
            let placeholders: Vec<&str> = query.tags.iter().map(|_| "?").collect();
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(c.tags) WHERE json_each.value IN ({}))",
                placeholders.join(", ")
            ));
            bind_values.extend(query.tags.iter().cloned());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {COLUMNS} FROM contexts c {where_clause} ORDER BY c.created_at DESC, c.rowid DESC"
        );

        let mut sql_query = sqlx::query(&sql);
        for value in &bind_values {
            sql_query = sql_query.bind(value);
        }

        let rows = sql_query.fetch_all(self.pool).await?;
        Ok(rows.iter().map(row_to_context).collect())
    }

    async fn update(&self, id: &str, update: &ContextUpdate) -> DbResult<Context> {
        let result = sqlx::query(
            "UPDATE contexts SET task_id = ?, title = ?, content = ?, tags = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&update.task_id)
        .bind(&update.title)
        .bind(&update.content)
        .bind(tags_to_json(&update.tags))
        .bind(current_timestamp())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Context", id));
        }

        self.get(id).await
    }

    async fn delete(&self, id: &str) -> DbResult<Context> {
        let context = self.get(id).await?;

        sqlx::query("DELETE FROM contexts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(context)
    }
}
