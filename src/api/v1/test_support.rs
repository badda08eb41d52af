//! Shared fixtures for the HTTP tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::api::{AppState, Config, create_router};
use crate::db::{Database, SqliteDatabase};
use crate::hub::{self, Event, HubHandle};

pub(crate) struct TestApp {
    pub app: Router,
    pub hub: HubHandle,
    pub shutdown: CancellationToken,
}

/// Router over a fresh in-memory store.
pub(crate) async fn test_app() -> TestApp {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    build(Some(Arc::new(db)))
}

/// Router running without a store.
pub(crate) fn test_app_without_store() -> TestApp {
    build(None)
}

fn build(db: Option<Arc<SqliteDatabase>>) -> TestApp {
    let shutdown = CancellationToken::new();
    let (hub, _task) = hub::spawn(shutdown.clone());
    let state = AppState::new(db, hub.clone(), &Config::default(), shutdown.clone());
    TestApp {
        app: create_router(state),
        hub,
        shutdown,
    }
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(crate) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Parse one hub frame.
pub(crate) fn event(frame: &str) -> Event {
    serde_json::from_str(frame).unwrap()
}
