//! Tests for SQLite database connection and migrations.

use crate::db::{Database, ProjectRepository, NewProject, SqliteDatabase};

#[tokio::test(flavor = "multi_thread")]
async fn migrate_creates_all_tables() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.migrate().await.expect("Migration should succeed");

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .expect("Query should succeed");

    let expected = vec!["_sqlx_migrations", "agents", "contexts", "projects", "tasks"];
    assert_eq!(tables, expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_is_idempotent() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.migrate().await.expect("First migration should succeed");
    db.migrate().await.expect("Second migration should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn foreign_keys_are_enforced() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");

    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(db.pool())
        .await
        .expect("Pragma should succeed");
    assert_eq!(enabled, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn open_file_database_persists_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tracker.db");

    {
        let db = SqliteDatabase::open(&path).await.expect("open should succeed");
        db.migrate().await.expect("Migration should succeed");
        db.projects()
            .create(&NewProject {
                name: "persisted".to_string(),
                description: String::new(),
            })
            .await
            .expect("Create should succeed");
        db.pool().close().await;
    }

    let db = SqliteDatabase::open(&path).await.expect("reopen should succeed");
    db.migrate().await.expect("Migration should succeed");
    let projects = db.projects().list().await.expect("List should succeed");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "persisted");
}
