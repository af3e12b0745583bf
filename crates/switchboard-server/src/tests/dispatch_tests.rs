//! Router-level behavior: envelopes, ids, unknown methods, initialize

use serde_json::json;

use switchboard_json_rpc::{JsonRpcRequest, RequestId};

use super::fixtures::{self, error, result};

#[tokio::test]
async fn test_ping_echoes_id_with_empty_result() {
    let server = fixtures::server();
    let request = JsonRpcRequest::new_no_params(RequestId::Number(7), "ping");
    let message = server.handle_request(request, None).await;

    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value, json!({"jsonrpc": "2.0", "id": 7, "result": {}}));
}

#[tokio::test]
async fn test_string_ids_are_echoed_verbatim() {
    let server = fixtures::server();
    let reply = server
        .handle_message(r#"{"jsonrpc":"2.0","id":"req-9","method":"ping"}"#, None)
        .await
        .unwrap();
    assert_eq!(reply.id(), Some(&RequestId::String("req-9".into())));
}

#[tokio::test]
async fn test_unknown_method_is_method_not_found() {
    let server = fixtures::server();
    let request = JsonRpcRequest::new_no_params(RequestId::Number(3), "tools/explode");
    let message = server.handle_request(request, None).await;

    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["id"], 3);
    assert_eq!(value["error"]["code"], -32601);
    assert!(
        value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("tools/explode")
    );
    assert!(value.get("result").is_none());
}

#[tokio::test]
async fn test_notifications_get_no_reply() {
    let server = fixtures::server();
    let reply = server
        .handle_message(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            None,
        )
        .await;
    assert!(reply.is_none());
}

#[tokio::test]
async fn test_malformed_json_is_dropped() {
    let server = fixtures::server();
    assert!(server.handle_message("{not json", None).await.is_none());
}

#[tokio::test]
async fn test_invalid_message_with_id_gets_error() {
    let server = fixtures::server();
    let reply = server
        .handle_message(r#"{"jsonrpc":"1.0","id":4,"method":"ping"}"#, None)
        .await
        .unwrap();
    assert!(reply.is_error());
    assert_eq!(reply.id(), Some(&RequestId::Number(4)));
}

#[tokio::test]
async fn test_handler_panic_becomes_internal_error() {
    let server = fixtures::server();
    let (code, _) = error(
        &server,
        "tools/call",
        json!({"name": "shape", "arguments": {"kind": "panic"}}),
    )
    .await;
    assert_eq!(code, -32603);
}

#[tokio::test]
async fn test_initialize_without_version_picks_first_supported() {
    let server = fixtures::server();
    let value = result(&server, "initialize", json!({"capabilities": {}})).await;

    assert_eq!(value["protocolVersion"], "2025-06-18");
    assert_eq!(value["serverInfo"]["name"], "fixture-server");
    assert_eq!(value["serverInfo"]["version"], "1.2.3");
    assert_eq!(value["serverInfo"]["title"], "Fixture Server");
    assert_eq!(value["instructions"], "Use the tools.");
    assert!(value["capabilities"]["tools"].is_object());
    assert!(value["capabilities"]["resources"].is_object());
    assert!(value["capabilities"]["prompts"].is_object());
    assert!(value["capabilities"]["completions"].is_object());
}

#[tokio::test]
async fn test_initialize_echoes_supported_version() {
    let server = fixtures::server();
    let value = result(
        &server,
        "initialize",
        json!({
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": {"name": "inspector", "version": "0.1.0"}
        }),
    )
    .await;
    assert_eq!(value["protocolVersion"], "2025-03-26");
}

#[tokio::test]
async fn test_initialize_rejects_unknown_version() {
    let server = fixtures::server();
    let message = fixtures::request(
        &server,
        "initialize",
        json!({"protocolVersion": "2001-01-01", "capabilities": {}}),
    )
    .await;

    let error = message.error_object().unwrap();
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("2001-01-01"));
    let supported = &error.data.as_ref().unwrap()["supported"];
    assert_eq!(supported[0], "2025-06-18");
}
