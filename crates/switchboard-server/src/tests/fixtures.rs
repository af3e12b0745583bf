//! Tools, resources and prompts shared by the router tests

use async_trait::async_trait;
use serde_json::{Value, json};

use switchboard_json_rpc::{JsonRpcMessage, JsonRpcRequest, RequestId};
use switchboard_protocol::{
    Annotations, CompletionContext, McpResult, PromptArgument, ToolAnnotations,
};

use crate::content::Content;
use crate::context::RequestContext;
use crate::prompt::McpPrompt;
use crate::resource::McpResource;
use crate::server::McpServer;
use crate::tool::McpTool;
use crate::validation::JsonSchemaValidator;

pub struct EchoTool;

#[async_trait]
impl McpTool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> Option<&str> {
        Some("Echo a message back")
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"message": {"type": "string"}},
            "required": ["message"]
        })
    }

    async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let validated = ctx.validate(&JsonSchemaValidator::new(self.input_schema()))?;
        let message = validated["message"].as_str().unwrap_or_default();
        Ok(vec![Content::text(format!("Echo: {}", message))])
    }
}

pub struct SumTool;

#[async_trait]
impl McpTool for SumTool {
    fn name(&self) -> &str {
        "sum"
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new()
            .with_read_only_hint(true)
            .with_idempotent_hint(true)
    }

    async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let a = ctx.argument("a").and_then(Value::as_i64).unwrap_or(0);
        let b = ctx.argument("b").and_then(Value::as_i64).unwrap_or(0);
        Ok(vec![Content::structured(json!({"sum": a + b}))])
    }
}

/// Returns the named content kind
pub struct ShapeTool;

#[async_trait]
impl McpTool for ShapeTool {
    fn name(&self) -> &str {
        "shape"
    }

    async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let content = match ctx.str_argument("kind").unwrap_or("text") {
            "error" => Content::error("boom"),
            "blob" => Content::blob(b"raw"),
            "link" => Content::resource_link("file://readme.md"),
            "embed" => Content::embedded_resource("file://users/42"),
            "missing-link" => Content::resource_link("file://nowhere"),
            "panic" => panic!("handler bug"),
            _ => Content::text("plain").with_meta_entry("trace", json!("t-1")),
        };
        Ok(vec![content])
    }
}

pub struct ReadmeResource;

#[async_trait]
impl McpResource for ReadmeResource {
    fn uri(&self) -> &str {
        "file://readme.md"
    }

    fn name(&self) -> &str {
        "readme"
    }

    fn title(&self) -> Option<&str> {
        Some("Project README")
    }

    fn mime_type(&self) -> Option<&str> {
        Some("text/markdown")
    }

    fn size(&self) -> Option<u64> {
        Some(8)
    }

    async fn read(&self, _ctx: &RequestContext) -> McpResult<Content> {
        Ok(Content::text("# Readme"))
    }
}

pub struct UserResource;

#[async_trait]
impl McpResource for UserResource {
    fn uri(&self) -> &str {
        "file://users/{id}"
    }

    fn name(&self) -> &str {
        "user"
    }

    fn mime_type(&self) -> Option<&str> {
        Some("application/json")
    }

    fn annotations(&self) -> Option<Annotations> {
        Some(Annotations::new().with_priority(0.8))
    }

    async fn read(&self, ctx: &RequestContext) -> McpResult<Content> {
        let id = ctx.str_argument("id").unwrap_or_default();
        Ok(Content::text(json!({"id": id}).to_string()))
    }

    async fn complete(
        &self,
        argument: &str,
        value: &str,
        _context: &CompletionContext,
    ) -> McpResult<Vec<String>> {
        if argument != "id" {
            return Ok(Vec::new());
        }
        Ok((1..=250)
            .map(|n| n.to_string())
            .filter(|id| id.starts_with(value))
            .collect())
    }
}

pub struct MeResource;

#[async_trait]
impl McpResource for MeResource {
    fn uri(&self) -> &str {
        "file://users/me"
    }

    fn name(&self) -> &str {
        "me"
    }

    async fn read(&self, _ctx: &RequestContext) -> McpResult<Content> {
        Ok(Content::text("current user"))
    }
}

pub struct BrokenResource;

#[async_trait]
impl McpResource for BrokenResource {
    fn uri(&self) -> &str {
        "file://broken"
    }

    fn name(&self) -> &str {
        "broken"
    }

    async fn read(&self, _ctx: &RequestContext) -> McpResult<Content> {
        Ok(Content::error("disk unavailable"))
    }
}

pub struct GreetingPrompt;

#[async_trait]
impl McpPrompt for GreetingPrompt {
    fn name(&self) -> &str {
        "greeting"
    }

    fn description(&self) -> Option<&str> {
        Some("Greet someone")
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        vec![
            PromptArgument::new("name").required(),
            PromptArgument::new("style"),
        ]
    }

    async fn get(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let name = ctx.str_argument("name").unwrap_or_default();
        Ok(vec![
            Content::text(format!("Please greet {}", name)),
            Content::text(format!("Hello, {}!", name)).as_assistant(),
        ])
    }

    async fn complete(
        &self,
        argument: &str,
        value: &str,
        _context: &CompletionContext,
    ) -> McpResult<Vec<String>> {
        if argument != "style" {
            return Ok(Vec::new());
        }
        Ok(["casual", "formal", "friendly"]
            .iter()
            .filter(|s| s.starts_with(value))
            .map(|s| s.to_string())
            .collect())
    }
}

/// Structured content cannot become a prompt message
pub struct StructuredPrompt;

#[async_trait]
impl McpPrompt for StructuredPrompt {
    fn name(&self) -> &str {
        "structured"
    }

    async fn get(&self, _ctx: &RequestContext) -> McpResult<Vec<Content>> {
        Ok(vec![Content::structured(json!({"a": 1}))])
    }
}

pub fn server() -> McpServer {
    McpServer::builder()
        .name("fixture-server")
        .version("1.2.3")
        .title("Fixture Server")
        .instructions("Use the tools.")
        .with_completions()
        .tool(EchoTool)
        .tool(SumTool)
        .tool(ShapeTool)
        .resource(UserResource)
        .resource(MeResource)
        .resource(ReadmeResource)
        .resource(BrokenResource)
        .prompt(GreetingPrompt)
        .prompt(StructuredPrompt)
        .build()
        .expect("fixture server builds")
}

pub async fn request(server: &McpServer, method: &str, params: Value) -> JsonRpcMessage {
    let request = JsonRpcRequest::with_value_params(RequestId::Number(1), method, params);
    server.handle_request(request, None).await
}

/// The successful result, panicking on an error envelope
pub async fn result(server: &McpServer, method: &str, params: Value) -> Value {
    let message = request(server, method, params).await;
    match message.result() {
        Some(value) => value.clone(),
        None => panic!("{} failed: {:?}", method, message.error_object()),
    }
}

/// The error code and message, panicking on success
pub async fn error(server: &McpServer, method: &str, params: Value) -> (i64, String) {
    let message = request(server, method, params).await;
    match message.error_object() {
        Some(object) => (object.code, object.message.clone()),
        None => panic!("{} unexpectedly succeeded: {:?}", method, message.result()),
    }
}
