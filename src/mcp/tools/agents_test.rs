//! Tests for agent tools.

use std::sync::Arc;

use serde_json::Value;

use crate::db::{
    AgentQuery, AgentRepository, Database, NewAgent, NewProject, ProjectRepository,
    SqliteDatabase,
};
use crate::mcp::tools::AgentTools;

async fn seeded() -> (Arc<SqliteDatabase>, String, String) {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let alpha = db
        .projects()
        .create(&NewProject {
            name: "alpha".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    let beta = db
        .projects()
        .create(&NewProject {
            name: "beta".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();

    for (project, name) in [(&alpha, "a1"), (&alpha, "a2"), (&beta, "b1")] {
        db.agents()
            .create(&NewAgent {
                project_id: project.id.clone(),
                name: name.to_string(),
                role: "backend".to_string(),
                team: Some("core".to_string()),
            })
            .await
            .unwrap();
    }

    (Arc::new(db), alpha.id, beta.id)
}

#[tokio::test(flavor = "multi_thread")]
async fn list_agents_filters_by_project() {
    let (db, alpha, _beta) = seeded().await;
    let tools = AgentTools::new(Some(db));

    let all: Vec<Value> =
        serde_json::from_str(&tools.list_agents(&AgentQuery::default()).await.text).unwrap();
    assert_eq!(all.len(), 3);

    let outcome = tools
        .list_agents(&AgentQuery {
            project_id: Some(alpha),
        })
        .await;
    let names: Vec<String> = serde_json::from_str::<Vec<Value>>(&outcome.text)
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a2", "a1"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_agent_includes_team() {
    let (db, _alpha, beta) = seeded().await;
    let agent = db
        .agents()
        .list(&AgentQuery {
            project_id: Some(beta),
        })
        .await
        .unwrap()
        .remove(0);
    let tools = AgentTools::new(Some(db));

    let outcome = tools.get_agent(&agent.id).await;
    assert!(!outcome.is_error);
    let value: Value = serde_json::from_str(&outcome.text).unwrap();
    assert_eq!(value["team"], "core");
    assert_eq!(value["name"], "b1");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_missing_agent_is_in_band_error() {
    let (db, _, _) = seeded().await;
    let tools = AgentTools::new(Some(db));

    assert!(tools.get_agent("ghost").await.is_error);
}
