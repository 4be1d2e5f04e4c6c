use kay_core::catalog::{ConfigComponent, QueryEntity};
use kay_core::store::MemoryStore;
use kay_mcp::KayMcp;
use kay_mcp::tools::{GET_KAY_CONFIG, GET_MEMORY_TOPICS, QUERY_KAY_SYSTEM};
use rmcp::model::{CallToolResult, JsonObject};
use serde_json::{Value, json};

fn args(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("arguments fixture should be an object, got {other}"),
    }
}

fn text(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|content| content.text.as_str())
        .expect("tool result should carry one text block")
}

fn payload(result: &CallToolResult) -> Value {
    assert_ne!(result.is_error, Some(true), "unexpected error: {}", text(result));
    serde_json::from_str(text(result)).expect("tool text should be JSON")
}

#[tokio::test]
async fn unknown_tool_is_an_error_result() {
    let server = KayMcp::new(MemoryStore::new());

    let result = server.dispatch("drop_everything", None).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text(&result), "Error: Unknown tool: drop_everything");
}

#[tokio::test]
async fn missing_argument_is_an_error_result() {
    let server = KayMcp::new(MemoryStore::new());

    let result = server.dispatch(QUERY_KAY_SYSTEM, None).await;

    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).starts_with("Error: "));
    assert!(text(&result).contains("entity"));
}

#[tokio::test]
async fn non_string_component_is_an_error_result() {
    let server = KayMcp::new(MemoryStore::new());

    let result = server
        .dispatch(GET_KAY_CONFIG, Some(&args(json!({ "component": ["integrations"] }))))
        .await;

    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).starts_with("Error: invalid arguments: "));
}

#[tokio::test]
async fn store_fault_is_an_error_result() {
    let store = MemoryStore::new()
        .with_failure(QueryEntity::RecentSyncs.statement(), "connection refused");
    let server = KayMcp::new(store);

    let result = server
        .dispatch(QUERY_KAY_SYSTEM, Some(&args(json!({ "entity": "recent-syncs" }))))
        .await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text(&result), "Error: connection refused");
}

#[tokio::test]
async fn query_returns_envelope_json() {
    let store = MemoryStore::new().with_rows(
        QueryEntity::TasksSummary.statement(),
        serde_json::from_value(json!([
            { "status": "open", "count": 2 },
            { "status": "done", "count": "5" }
        ]))
        .expect("rows fixture"),
    );
    let server = KayMcp::new(store);

    let result = server
        .dispatch(QUERY_KAY_SYSTEM, Some(&args(json!({ "entity": "tasks-summary" }))))
        .await;
    let body = payload(&result);

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total"], json!(7));
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn unknown_entity_is_a_plain_result() {
    let server = KayMcp::new(MemoryStore::new());

    let result = server
        .dispatch(QUERY_KAY_SYSTEM, Some(&args(json!({ "entity": "everything" }))))
        .await;
    let body = payload(&result);

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Unknown entity: everything"));
    assert_eq!(
        body["available"],
        json!(QueryEntity::names().collect::<Vec<_>>())
    );
}

#[tokio::test]
async fn integrations_config_lists_services() {
    let server = KayMcp::new(MemoryStore::new().failing("database should not be touched"));

    let result = server
        .dispatch(GET_KAY_CONFIG, Some(&args(json!({ "component": "integrations" }))))
        .await;
    let body = payload(&result);

    assert_eq!(body["success"], json!(true));
    let services = body["services"].as_array().expect("services list");
    assert_eq!(services.len(), 8);
    assert!(services.iter().any(|service| service["name"] == json!("Notion")));
}

#[tokio::test]
async fn nonexistent_component_is_a_plain_result() {
    let server = KayMcp::new(MemoryStore::new());

    let result = server
        .dispatch(GET_KAY_CONFIG, Some(&args(json!({ "component": "nonexistent" }))))
        .await;

    assert_eq!(
        payload(&result),
        json!({
            "success": false,
            "error": "Unknown component: nonexistent",
            "available": ConfigComponent::names().collect::<Vec<_>>(),
        })
    );
}

#[tokio::test]
async fn memory_topics_ignores_arguments() {
    let server = KayMcp::new(MemoryStore::new().failing("database should not be touched"));

    let bare = payload(&server.dispatch(GET_MEMORY_TOPICS, None).await);
    let noisy = payload(
        &server
            .dispatch(GET_MEMORY_TOPICS, Some(&args(json!({ "verbose": true }))))
            .await,
    );

    assert_eq!(bare, noisy);
    assert_eq!(bare["learnings_topics"].as_array().map(Vec::len), Some(5));
}

#[test]
fn registry_matches_server_tools() {
    let server = KayMcp::new(MemoryStore::new());
    let names: Vec<String> = server.tools().iter().map(|tool| tool.name.to_string()).collect();
    assert_eq!(names, vec![QUERY_KAY_SYSTEM, GET_KAY_CONFIG, GET_MEMORY_TOPICS]);
}
