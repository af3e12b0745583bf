//! Cursor paging through the list methods

use serde_json::{Value, json};

use super::fixtures::{self, EchoTool, ShapeTool, SumTool, result};
use crate::server::McpServer;

fn names(value: &Value, key: &str) -> Vec<String> {
    value[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_per_page_and_cursor_walk() {
    let server = fixtures::server();

    let first = result(&server, "tools/list", json!({"perPage": 2})).await;
    assert_eq!(names(&first, "tools"), vec!["echo", "sum"]);
    let cursor = first["nextCursor"].as_str().unwrap().to_string();

    let second = result(
        &server,
        "tools/list",
        json!({"perPage": 2, "cursor": cursor}),
    )
    .await;
    assert_eq!(names(&second, "tools"), vec!["shape"]);
    assert!(second.get("nextCursor").is_none());
}

#[tokio::test]
async fn test_garbage_cursor_restarts() {
    let server = fixtures::server();
    let value = result(&server, "prompts/list", json!({"cursor": "%%%"})).await;
    assert_eq!(names(&value, "prompts"), vec!["greeting", "structured"]);
}

#[tokio::test]
async fn test_server_page_sizes() {
    let server = McpServer::builder()
        .name("paged")
        .default_page_size(1)
        .max_page_size(2)
        .tool(EchoTool)
        .tool(SumTool)
        .tool(ShapeTool)
        .build()
        .expect("server builds");

    let value = result(&server, "tools/list", json!({})).await;
    assert_eq!(names(&value, "tools"), vec!["echo"]);

    let value = result(&server, "tools/list", json!({"perPage": 100})).await;
    assert_eq!(names(&value, "tools"), vec!["echo", "sum"]);
    assert!(value["nextCursor"].is_string());

    let value = result(&server, "tools/list", json!({"perPage": 0})).await;
    assert_eq!(names(&value, "tools"), vec!["echo"]);
}
