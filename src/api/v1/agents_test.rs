//! Integration tests for Agent API endpoints.

use axum::{Router, http::StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::test_support::{delete, event, get, json_body, json_request, test_app};
use crate::hub::{Connection, EventTag};

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", uri, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test(flavor = "multi_thread")]
async fn create_agent_broadcasts_to_its_project() {
    let t = test_app().await;
    let project = create(&t.app, "/api/projects", json!({"name": "P"})).await;
    let project_id = project["id"].as_str().unwrap();

    let (conn, mut rx) = Connection::new(8);
    t.hub.register(&conn, project_id);

    let agent = create(
        &t.app,
        "/api/agents",
        json!({"project_id": project_id, "name": "frontend-bot", "role": "frontend", "team": "web"}),
    )
    .await;
    assert_eq!(agent["status"], "active");
    assert_eq!(agent["team"], "web");

    let frame = event(&rx.recv().await.unwrap());
    assert_eq!(frame.tag, EventTag::AgentCreated);
    assert_eq!(frame.payload, agent);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_agents_filters_by_project() {
    let t = test_app().await;
    let a = create(&t.app, "/api/projects", json!({"name": "A"})).await;
    let b = create(&t.app, "/api/projects", json!({"name": "B"})).await;
    create(
        &t.app,
        "/api/agents",
        json!({"project_id": a["id"], "name": "one", "role": "backend"}),
    )
    .await;
    create(
        &t.app,
        "/api/agents",
        json!({"project_id": b["id"], "name": "two", "role": "backend"}),
    )
    .await;

    let response = t
        .app
        .clone()
        .oneshot(get(&format!(
            "/api/agents?project_id={}",
            a["id"].as_str().unwrap()
        )))
        .await
        .unwrap();
    let agents = json_body(response).await;
    assert_eq!(agents.as_array().unwrap().len(), 1);
    assert_eq!(agents[0]["name"], "one");

    let response = t.app.oneshot(get("/api/agents")).await.unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_agent_status() {
    let t = test_app().await;
    let project = create(&t.app, "/api/projects", json!({"name": "P"})).await;
    let agent = create(
        &t.app,
        "/api/agents",
        json!({"project_id": project["id"], "name": "bot", "role": "qa"}),
    )
    .await;
    let id = agent["id"].as_str().unwrap();

    let response = t
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/agents/{}/status", id),
            json!({"status": "offline"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "offline");

    let response = t
        .app
        .oneshot(json_request(
            "PUT",
            &format!("/api/agents/{}/status", id),
            json!({"status": "asleep"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_agent_then_get_is_not_found() {
    let t = test_app().await;
    let project = create(&t.app, "/api/projects", json!({"name": "P"})).await;
    let agent = create(
        &t.app,
        "/api/agents",
        json!({"project_id": project["id"], "name": "bot", "role": "qa"}),
    )
    .await;
    let id = agent["id"].as_str().unwrap();

    let response = t
        .app
        .clone()
        .oneshot(delete(&format!("/api/agents/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = t
        .app
        .oneshot(get(&format!("/api/agents/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
