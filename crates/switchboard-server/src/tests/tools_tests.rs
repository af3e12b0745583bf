//! tools/list and tools/call through the router

use serde_json::json;

use super::fixtures::{self, error, result};

#[tokio::test]
async fn test_tools_list_in_registration_order() {
    let server = fixtures::server();
    let value = result(&server, "tools/list", json!({})).await;

    let names: Vec<&str> = value["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["echo", "sum", "shape"]);
    assert_eq!(value["tools"][0]["inputSchema"]["required"], json!(["message"]));
    assert_eq!(value["tools"][1]["annotations"]["readOnlyHint"], true);
    assert!(value.get("nextCursor").is_none());
}

#[tokio::test]
async fn test_call_returns_text_content() {
    let server = fixtures::server();
    let value = result(
        &server,
        "tools/call",
        json!({"name": "echo", "arguments": {"message": "hi"}}),
    )
    .await;
    assert_eq!(value["content"], json!([{"type": "text", "text": "Echo: hi"}]));
    assert_eq!(value["isError"], false);
}

#[tokio::test]
async fn test_validation_failure_is_error_result_not_envelope() {
    let server = fixtures::server();
    let value = result(
        &server,
        "tools/call",
        json!({"name": "echo", "arguments": {"message": 5}}),
    )
    .await;
    assert_eq!(value["isError"], true);
    assert_eq!(
        value["content"][0]["text"],
        "The message field must be a string."
    );
}

#[tokio::test]
async fn test_missing_arguments_fail_validation() {
    let server = fixtures::server();
    let value = result(&server, "tools/call", json!({"name": "echo"})).await;
    assert_eq!(value["isError"], true);
    assert_eq!(value["content"][0]["text"], "The message field is required.");
}

#[tokio::test]
async fn test_unknown_tool_is_invalid_params() {
    let server = fixtures::server();
    let (code, message) = error(&server, "tools/call", json!({"name": "nope"})).await;
    assert_eq!(code, -32602);
    assert_eq!(message, "Tool [nope] not found.");
}

#[tokio::test]
async fn test_missing_name_is_invalid_params() {
    let server = fixtures::server();
    let (code, _) = error(&server, "tools/call", json!({"arguments": {}})).await;
    assert_eq!(code, -32602);
}

#[tokio::test]
async fn test_structured_content() {
    let server = fixtures::server();
    let value = result(
        &server,
        "tools/call",
        json!({"name": "sum", "arguments": {"a": 2, "b": 3}}),
    )
    .await;
    assert_eq!(value["structuredContent"], json!({"sum": 5}));
    assert_eq!(value["content"][0]["text"], r#"{"sum":5}"#);
}

#[tokio::test]
async fn test_meta_only_when_set() {
    let server = fixtures::server();
    let value = result(&server, "tools/call", json!({"name": "shape"})).await;
    assert_eq!(value["content"][0]["_meta"], json!({"trace": "t-1"}));

    let value = result(
        &server,
        "tools/call",
        json!({"name": "echo", "arguments": {"message": "x"}}),
    )
    .await;
    assert!(value["content"][0].get("_meta").is_none());
}

#[tokio::test]
async fn test_error_content_marks_result() {
    let server = fixtures::server();
    let value = result(
        &server,
        "tools/call",
        json!({"name": "shape", "arguments": {"kind": "error"}}),
    )
    .await;
    assert_eq!(value["isError"], true);
    assert_eq!(value["content"][0]["text"], "boom");
}

#[tokio::test]
async fn test_blob_content_fails_the_call() {
    let server = fixtures::server();
    let (code, message) = error(
        &server,
        "tools/call",
        json!({"name": "shape", "arguments": {"kind": "blob"}}),
    )
    .await;
    assert_eq!(code, -32603);
    assert_eq!(message, "Blob content may not be used in tools");
}

#[tokio::test]
async fn test_resource_link_is_resolved_to_descriptor() {
    let server = fixtures::server();
    let value = result(
        &server,
        "tools/call",
        json!({"name": "shape", "arguments": {"kind": "link"}}),
    )
    .await;
    assert_eq!(
        value["content"][0],
        json!({
            "type": "resource_link",
            "uri": "file://readme.md",
            "name": "readme",
            "title": "Project README",
            "mimeType": "text/markdown",
            "size": 8
        })
    );
}

#[tokio::test]
async fn test_link_to_unknown_resource_fails() {
    let server = fixtures::server();
    let (code, message) = error(
        &server,
        "tools/call",
        json!({"name": "shape", "arguments": {"kind": "missing-link"}}),
    )
    .await;
    assert_eq!(code, -32002);
    assert_eq!(message, "Resource [file://nowhere] not found.");
}

#[tokio::test]
async fn test_embedded_resource_inlines_template_read() {
    let server = fixtures::server();
    let value = result(
        &server,
        "tools/call",
        json!({"name": "shape", "arguments": {"kind": "embed"}}),
    )
    .await;
    let resource = &value["content"][0]["resource"];
    assert_eq!(value["content"][0]["type"], "resource");
    assert_eq!(resource["uri"], "file://users/42");
    assert_eq!(resource["mimeType"], "application/json");
    assert_eq!(resource["text"], r#"{"id":"42"}"#);
}
