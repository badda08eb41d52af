//! Integration tests for Project API endpoints.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::test_support::{delete, event, get, json_body, json_request, test_app};
use crate::hub::{Connection, EventTag};

#[tokio::test(flavor = "multi_thread")]
async fn list_projects_initially_empty() {
    let t = test_app().await;

    let response = t.app.oneshot(get("/api/projects")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_then_get_project() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/projects",
            json!({"name": "Shaker", "description": "Agent coordination"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["name"], "Shaker");
    assert_eq!(created["status"], "active");
    let id = created["id"].as_str().unwrap();

    let response = t
        .app
        .oneshot(get(&format!("/api/projects/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, created);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_project_without_name_is_bad_request() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(json_request("POST", "/api/projects", json!({"name": "  "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Validation"));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_missing_project_is_not_found() {
    let t = test_app().await;

    let response = t.app.oneshot(get("/api/projects/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn archive_project_broadcasts_update() {
    let t = test_app().await;
    let response = t
        .app
        .clone()
        .oneshot(json_request("POST", "/api/projects", json!({"name": "P"})))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let (conn, mut rx) = Connection::new(8);
    t.hub.register(&conn, &id);

    let response = t
        .app
        .oneshot(json_request(
            "PUT",
            &format!("/api/projects/{}/status", id),
            json!({"status": "archived"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "archived");

    let frame = event(&rx.recv().await.unwrap());
    assert_eq!(frame.tag, EventTag::ProjectUpdated);
    assert_eq!(frame.payload["status"], "archived");
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_project_status_is_bad_request() {
    let t = test_app().await;
    let response = t
        .app
        .clone()
        .oneshot(json_request("POST", "/api/projects", json!({"name": "P"})))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = t
        .app
        .oneshot(json_request(
            "PUT",
            &format!("/api/projects/{}/status", id),
            json!({"status": "frozen"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_project_broadcasts_id_only() {
    let t = test_app().await;
    let response = t
        .app
        .clone()
        .oneshot(json_request("POST", "/api/projects", json!({"name": "P"})))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let (conn, mut rx) = Connection::new(8);
    t.hub.register(&conn, &id);

    let response = t
        .app
        .clone()
        .oneshot(delete(&format!("/api/projects/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let frame = event(&rx.recv().await.unwrap());
    assert_eq!(frame.tag, EventTag::ProjectDeleted);
    assert_eq!(frame.payload, json!({"id": id}));

    let response = t
        .app
        .oneshot(delete(&format!("/api/projects/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
