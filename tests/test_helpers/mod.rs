//! Shared servers and clients for the end-to-end tests
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use switchboard_server::prelude::*;
use switchboard_transport::{HttpMcpServer, StdioTransport, TransportError};

/// Number of generated `op_NN` tools registered after `echo` and `whoami`
pub const GENERATED_TOOLS: usize = 20;

pub struct EchoTool;

#[async_trait]
impl McpTool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"message": {"type": "string"}},
            "required": ["message"]
        })
    }

    async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let arguments = ctx.validate(&JsonSchemaValidator::new(self.input_schema()))?;
        Ok(vec![Content::text(
            arguments["message"].as_str().unwrap_or_default(),
        )])
    }
}

/// Reports the session the request arrived on
pub struct WhoAmITool;

#[async_trait]
impl McpTool for WhoAmITool {
    fn name(&self) -> &str {
        "whoami"
    }

    async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let session = ctx.session().map(|s| s.session_id.clone());
        Ok(vec![Content::structured(json!({ "session": session }))])
    }
}

pub struct NumberedTool {
    name: String,
}

#[async_trait]
impl McpTool for NumberedTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, _ctx: &RequestContext) -> McpResult<Vec<Content>> {
        Ok(vec![Content::text(self.name.clone())])
    }
}

pub struct MemoResource;

#[async_trait]
impl McpResource for MemoResource {
    fn uri(&self) -> &str {
        "memo://{topic}"
    }

    fn name(&self) -> &str {
        "memo"
    }

    fn mime_type(&self) -> Option<&str> {
        Some("text/plain")
    }

    async fn read(&self, ctx: &RequestContext) -> McpResult<Content> {
        let topic = ctx.str_argument("topic").unwrap_or_default();
        Ok(Content::text(format!("Memo about {}", topic)))
    }

    async fn complete(
        &self,
        argument: &str,
        value: &str,
        _context: &CompletionContext,
    ) -> McpResult<Vec<String>> {
        if argument != "topic" {
            return Ok(Vec::new());
        }
        Ok(["budget", "backlog", "roadmap"]
            .iter()
            .filter(|topic| topic.starts_with(value))
            .map(|topic| topic.to_string())
            .collect())
    }
}

pub struct WelcomeResource;

#[async_trait]
impl McpResource for WelcomeResource {
    fn uri(&self) -> &str {
        "memo://welcome"
    }

    fn name(&self) -> &str {
        "welcome"
    }

    async fn read(&self, _ctx: &RequestContext) -> McpResult<Content> {
        Ok(Content::text("Welcome aboard"))
    }
}

pub struct ReviewPrompt;

#[async_trait]
impl McpPrompt for ReviewPrompt {
    fn name(&self) -> &str {
        "review"
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        vec![PromptArgument::new("topic").required()]
    }

    async fn get(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let topic = ctx.str_argument("topic").unwrap_or_default();
        Ok(vec![
            Content::text(format!("Review the {} memo", topic)),
            Content::embedded_resource(format!("memo://{}", topic)),
        ])
    }
}

/// A server with enough tools to span two default-sized pages
pub fn catalog_server() -> McpServer {
    let mut builder = McpServer::builder()
        .name("catalog")
        .version("0.1.0")
        .with_completions()
        .tool(EchoTool)
        .tool(WhoAmITool)
        .resource(WelcomeResource)
        .resource(MemoResource)
        .prompt(ReviewPrompt);
    for n in 1..=GENERATED_TOOLS {
        builder = builder.tool(NumberedTool {
            name: format!("op_{:02}", n),
        });
    }
    builder.build().expect("catalog server builds")
}

pub fn request(id: i64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

pub fn initialize_request(id: i64) -> Value {
    request(
        id,
        "initialize",
        json!({
            "protocolVersion": "2025-06-18",
            "capabilities": {},
            "clientInfo": {"name": "e2e-client", "version": "1.0.0"}
        }),
    )
}

/// Client end of a stdio transport running on in-memory pipes
pub struct StdioHarness {
    input: DuplexStream,
    output: Lines<BufReader<DuplexStream>>,
    server: JoinHandle<Result<(), TransportError>>,
}

impl StdioHarness {
    pub fn start(server: &McpServer) -> Self {
        let (input, server_input) = tokio::io::duplex(64 * 1024);
        let (server_output, output) = tokio::io::duplex(64 * 1024);

        let transport = StdioTransport::new(server.service());
        let server = tokio::spawn(async move { transport.run(server_input, server_output).await });

        Self {
            input,
            output: BufReader::new(output).lines(),
            server,
        }
    }

    pub async fn send(&mut self, message: &Value) {
        self.send_raw(&format!("{}\n", message)).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.input.write_all(text.as_bytes()).await.unwrap();
        self.input.flush().await.unwrap();
    }

    pub async fn recv(&mut self) -> Value {
        let line = self
            .output
            .next_line()
            .await
            .unwrap()
            .expect("server closed its output");
        serde_json::from_str(&line).unwrap()
    }

    pub async fn call(&mut self, message: Value) -> Value {
        self.send(&message).await;
        self.recv().await
    }

    /// Close the input and wait for the loop to finish
    pub async fn shutdown(self) -> Result<(), TransportError> {
        drop(self.input);
        self.server.await.expect("stdio task panicked")
    }
}

/// An HTTP endpoint serving `server` on an ephemeral port; returns its URL
pub async fn start_http_server(server: &McpServer) -> (String, HttpMcpServer) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let http = HttpMcpServer::builder()
        .service(server.service())
        .bind_address(addr)
        .build()
        .unwrap();

    let running = http.clone();
    tokio::spawn(async move {
        if let Err(e) = running.serve(listener).await {
            eprintln!("Server error: {}", e);
        }
    });

    (format!("http://{}/mcp", addr), http)
}
