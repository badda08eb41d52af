//! Tests for dashboard aggregation.

use crate::db::{
    Database, DashboardStats, DashboardSummary, NewContext, NewProject, NewTask,
    ProjectRepository, ProjectStatus, SqliteDatabase, TaskRepository, TaskStatus,
    ContextRepository,
};

#[tokio::test(flavor = "multi_thread")]
async fn empty_store_counts_zero() {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let stats = db.dashboard_stats().await.expect("Stats should succeed");
    assert_eq!(stats, DashboardStats::default());
}

#[tokio::test(flavor = "multi_thread")]
async fn counts_by_status() {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let project = db
        .projects()
        .create(&NewProject {
            name: "p".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    let archived = db
        .projects()
        .create(&NewProject {
            name: "old".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    db.projects()
        .update_status(&archived.id, ProjectStatus::Archived)
        .await
        .unwrap();

    let task = |title: &str| NewTask {
        project_id: project.id.clone(),
        title: title.to_string(),
        ..Default::default()
    };
    db.tasks().create(&task("one")).await.unwrap();
    let two = db.tasks().create(&task("two")).await.unwrap();
    let three = db.tasks().create(&task("three")).await.unwrap();
    db.tasks().update_status(&two.id, TaskStatus::Done).await.unwrap();
    db.tasks()
        .update_status(&three.id, TaskStatus::Blocked)
        .await
        .unwrap();

    db.contexts()
        .create(&NewContext {
            project_id: project.id.clone(),
            title: "ctx".to_string(),
            content: "c".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let stats = db.dashboard_stats().await.unwrap();
    assert_eq!(stats.projects.total, 2);
    assert_eq!(stats.projects.active, 1);
    assert_eq!(stats.projects.archived, 1);
    assert_eq!(stats.tasks.total, 3);
    assert_eq!(stats.tasks.pending, 1);
    assert_eq!(stats.tasks.done, 1);
    assert_eq!(stats.tasks.blocked, 1);
    assert_eq!(stats.tasks.in_progress, 0);
    assert_eq!(stats.contexts.total, 1);

    let summary = DashboardSummary::from(stats);
    assert_eq!(summary.projects, 2);
    assert_eq!(summary.pending_tasks, 1);
    assert_eq!(summary.blocked_tasks, 1);
}
