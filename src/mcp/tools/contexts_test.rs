//! Tests for context tools.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::db::{ContextQuery, Database, NewContext, NewProject, ProjectRepository, SqliteDatabase};
use crate::hub::{self, Connection, Event, EventTag};
use crate::mcp::tools::ContextTools;

#[tokio::test(flavor = "multi_thread")]
async fn add_context_broadcasts_and_lists() {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    let project = db
        .projects()
        .create(&NewProject {
            name: "docs".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    let (hub, _task) = hub::spawn(CancellationToken::new());
    let (conn, mut rx) = Connection::new(8);
    hub.register(&conn, &project.id);
    let tools = ContextTools::new(Some(Arc::new(db)), hub);

    let outcome = tools
        .add_context(&NewContext {
            project_id: project.id.clone(),
            title: "API conventions".to_string(),
            content: "# Use JSON".to_string(),
            tags: vec!["api".to_string()],
            ..Default::default()
        })
        .await;
    assert!(!outcome.is_error, "{}", outcome.text);
    let created: Value = serde_json::from_str(&outcome.text).unwrap();
    assert_eq!(created["success"], true);
    assert_eq!(created["title"], "API conventions");

    let event: Event = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(event.tag, EventTag::ContextAdded);
    assert_eq!(event.payload["tags"], serde_json::json!(["api"]));

    let listed = tools
        .list_contexts(&ContextQuery {
            project_id: Some(project.id.clone()),
            tags: vec![],
        })
        .await;
    let contexts: Vec<Value> = serde_json::from_str(&listed.text).unwrap();
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0]["id"], created["id"]);
}

#[tokio::test]
async fn add_context_without_store_is_in_band_error() {
    let (hub, _task) = hub::spawn(CancellationToken::new());
    let tools: ContextTools<SqliteDatabase> = ContextTools::new(None, hub);

    let outcome = tools.add_context(&NewContext::default()).await;
    assert!(outcome.is_error);
    assert!(outcome.text.contains("Database not connected"));
}
