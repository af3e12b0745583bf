use serde_json::json;

use super::fixtures::{self, error, result};

#[tokio::test]
async fn test_list_prompts_with_arguments() {
    let server = fixtures::server();
    let value = result(&server, "prompts/list", json!({})).await;

    let greeting = &value["prompts"][0];
    assert_eq!(greeting["name"], "greeting");
    assert_eq!(greeting["description"], "Greet someone");
    assert_eq!(greeting["arguments"][0], json!({"name": "name", "required": true}));
    assert_eq!(value["prompts"][1]["name"], "structured");
}

#[tokio::test]
async fn test_get_renders_messages_with_roles() {
    let server = fixtures::server();
    let value = result(
        &server,
        "prompts/get",
        json!({"name": "greeting", "arguments": {"name": "Ada"}}),
    )
    .await;

    assert_eq!(
        value,
        json!({
            "description": "Greet someone",
            "messages": [
                {"role": "user", "content": {"type": "text", "text": "Please greet Ada"}},
                {"role": "assistant", "content": {"type": "text", "text": "Hello, Ada!"}}
            ]
        })
    );
}

#[tokio::test]
async fn test_missing_required_argument() {
    let server = fixtures::server();
    let message = fixtures::request(&server, "prompts/get", json!({"name": "greeting"})).await;

    let error = message.error_object().unwrap();
    assert_eq!(error.code, -32602);
    assert_eq!(error.message, "The name argument is required.");
    assert_eq!(
        error.data.as_ref().unwrap()["errors"][0],
        json!({"field": "name", "message": "The name argument is required."})
    );
}

#[tokio::test]
async fn test_structured_content_cannot_be_a_message() {
    let server = fixtures::server();
    let (code, message) = error(&server, "prompts/get", json!({"name": "structured"})).await;
    assert_eq!(code, -32603);
    assert_eq!(message, "Structured content may not be used in prompts");
}

#[tokio::test]
async fn test_unknown_prompt() {
    let server = fixtures::server();
    let (code, message) = error(&server, "prompts/get", json!({"name": "farewell"})).await;
    assert_eq!(code, -32602);
    assert_eq!(message, "Prompt [farewell] not found.");
}
