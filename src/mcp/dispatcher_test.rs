//! Tests for the protocol method table.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::db::{
    Database, NewProject, NewTask, ProjectRepository, SqliteDatabase, TaskRepository, TaskStatus,
};
use crate::hub;
use crate::mcp::Dispatcher;
use crate::mcp::protocol::{
    INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, RESOURCE_READ_FAILED,
};

async fn dispatcher() -> (Dispatcher<SqliteDatabase>, Arc<SqliteDatabase>) {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    let db = Arc::new(db);
    let (hub, _task) = hub::spawn(CancellationToken::new());
    (Dispatcher::new(Some(Arc::clone(&db)), hub), db)
}

fn disconnected() -> Dispatcher<SqliteDatabase> {
    let (hub, _task) = hub::spawn(CancellationToken::new());
    Dispatcher::new(None, hub)
}

async fn send(dispatcher: &Dispatcher<SqliteDatabase>, request: Value) -> Value {
    let body = serde_json::to_vec(&request).unwrap();
    let response = dispatcher
        .handle_raw(&body)
        .await
        .expect("request should be answered");
    serde_json::to_value(response).unwrap()
}

fn tool_text(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn initialize_negotiates_and_advertises() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
               "params": {"protocolVersion": "2025-03-26", "clientInfo": {"name": "test"}}}),
    )
    .await;

    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 1);
    let result = &response["result"];
    assert_eq!(result["protocolVersion"], "2025-03-26");
    assert_eq!(result["serverInfo"]["name"], "agent-shaker");
    assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    assert_eq!(result["capabilities"]["resources"]["subscribe"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn initialize_falls_back_for_unknown_version() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": "a", "method": "initialize",
               "params": {"protocolVersion": "1999-01-01"}}),
    )
    .await;
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": "b", "method": "initialize"}),
    )
    .await;
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
}

#[tokio::test(flavor = "multi_thread")]
async fn initialized_notification_gets_no_response() {
    let (dispatcher, _) = dispatcher().await;

    for method in ["initialized", "notifications/initialized"] {
        let body = serde_json::to_vec(&json!({"jsonrpc": "2.0", "method": method})).unwrap();
        assert!(dispatcher.handle_raw(&body).await.is_none());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn initialized_with_id_gets_empty_result() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 2, "method": "initialized"}),
    )
    .await;
    assert_eq!(response["result"], json!({}));
}

#[tokio::test(flavor = "multi_thread")]
async fn ping_without_id_is_still_answered() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(&dispatcher, json!({"jsonrpc": "2.0", "method": "ping"})).await;
    assert_eq!(response, json!({"jsonrpc": "2.0", "result": {}}));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_method_names_the_method() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 9, "method": "prompts/list"}),
    )
    .await;
    assert_eq!(response["id"], 9);
    assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
    assert_eq!(response["error"]["message"], "Method not found");
    assert_eq!(response["error"]["data"], "Unknown method: prompts/list");
    assert!(response.get("result").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_is_parse_error() {
    let (dispatcher, _) = dispatcher().await;

    let response = dispatcher.handle_raw(b"{not json").await.unwrap();
    let value = serde_json::to_value(response).unwrap();
    assert_eq!(value["error"]["code"], PARSE_ERROR);
    assert!(value.get("id").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_method_keeps_the_id() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(&dispatcher, json!({"jsonrpc": "2.0", "id": 42})).await;

    assert_eq!(response["id"], 42);
    assert_eq!(response["error"]["code"], INVALID_REQUEST);
    assert_eq!(response["error"]["message"], "Invalid Request");
    assert!(response.get("result").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn non_string_method_keeps_the_id() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(&dispatcher, json!({"jsonrpc": "2.0", "id": "abc", "method": 7})).await;

    assert_eq!(response["id"], "abc");
    assert_eq!(response["error"]["code"], INVALID_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn tools_list_returns_catalog() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    )
    .await;
    let names: Vec<&str> = response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "list_projects",
            "get_project",
            "list_agents",
            "get_agent",
            "list_tasks",
            "create_task",
            "update_task_status",
            "list_contexts",
            "add_context",
            "get_dashboard"
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_tool_is_protocol_error() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "delete_everything", "arguments": {}}}),
    )
    .await;
    assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
    assert_eq!(response["error"]["message"], "Unknown tool");
    assert_eq!(response["error"]["data"], "Tool not found: delete_everything");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_argument_is_in_band_error() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "get_project", "arguments": {}}}),
    )
    .await;
    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(response["result"]["content"][0]["type"], "text");
}

#[tokio::test(flavor = "multi_thread")]
async fn tools_call_without_params_is_invalid_params() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call"}),
    )
    .await;
    assert_eq!(response["error"]["code"], INVALID_PARAMS);
    assert_eq!(response["error"]["message"], "Invalid params");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_projects_on_empty_store_is_array() {
    let (dispatcher, _) = dispatcher().await;

    send(&dispatcher, json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})).await;
    send(&dispatcher, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "list_projects"}}),
    )
    .await;

    assert_eq!(response["result"]["isError"], false);
    assert_eq!(tool_text(&response), json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_tasks_filters_pending_newest_first() {
    let (dispatcher, db) = dispatcher().await;
    let project = db
        .projects()
        .create(&NewProject {
            name: "P1".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        let task = db
            .tasks()
            .create(&NewTask {
                project_id: project.id.clone(),
                title: title.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        ids.push(task.id);
    }
    db.tasks().update_status(&ids[2], TaskStatus::Done).await.unwrap();

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call",
               "params": {"name": "list_tasks",
                          "arguments": {"project_id": project.id, "status": "pending"}}}),
    )
    .await;

    let tasks = tool_text(&response);
    let listed: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[1].as_str(), ids[0].as_str()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_resource_matches_dashboard_tool() {
    let (dispatcher, db) = dispatcher().await;
    db.projects()
        .create(&NewProject {
            name: "counted".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();

    let tool = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
               "params": {"name": "get_dashboard"}}),
    )
    .await;
    let resource = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 2, "method": "resources/read",
               "params": {"uri": "agent-shaker://dashboard"}}),
    )
    .await;

    let contents = &resource["result"]["contents"][0];
    assert_eq!(contents["uri"], "agent-shaker://dashboard");
    assert_eq!(contents["mimeType"], "application/json");
    let from_resource: Value = serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
    assert_eq!(from_resource, tool_text(&tool));
    assert_eq!(from_resource["projects"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn resources_list_has_four_entries() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
    )
    .await;
    assert_eq!(response["result"]["resources"].as_array().unwrap().len(), 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_resource_is_invalid_params() {
    let (dispatcher, _) = dispatcher().await;

    let response = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 1, "method": "resources/read",
               "params": {"uri": "agent-shaker://secrets"}}),
    )
    .await;
    assert_eq!(response["error"]["code"], INVALID_PARAMS);
    assert_eq!(response["error"]["message"], "Unknown resource");
    assert_eq!(response["error"]["data"], "Resource not found: agent-shaker://secrets");
}

#[tokio::test]
async fn disconnected_store_degrades_tools_and_resources() {
    let dispatcher = disconnected();

    let listed = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    )
    .await;
    assert!(listed.get("error").is_none());

    let call = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
               "params": {"name": "list_projects"}}),
    )
    .await;
    assert_eq!(call["result"]["isError"], true);
    assert_eq!(tool_text(&call), json!({"error": "Database not connected"}));

    let read = send(
        &dispatcher,
        json!({"jsonrpc": "2.0", "id": 3, "method": "resources/read",
               "params": {"uri": "agent-shaker://projects"}}),
    )
    .await;
    assert_eq!(read["error"]["code"], RESOURCE_READ_FAILED);
    assert_eq!(read["error"]["message"], "Resource read failed");
}
