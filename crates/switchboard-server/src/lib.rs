//! # Switchboard MCP Server
//!
//! The server engine: tools, resources and prompts registered by name or URI
//! pattern, a method router that answers every protocol method, and the
//! pieces it is built from (URI templates, cursor pagination, the content
//! model, per-request context and validation).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use switchboard_server::prelude::*;
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl McpTool for Greet {
//!     fn name(&self) -> &str { "greet" }
//!
//!     async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
//!         let who = ctx.str_argument("name").unwrap_or("world");
//!         Ok(vec![Content::text(format!("Hello, {}!", who))])
//!     }
//! }
//!
//! # async fn run() -> switchboard_server::Result<()> {
//! let server = McpServer::builder()
//!     .name("greeter")
//!     .version("1.0.0")
//!     .tool(Greet)
//!     .build()?;
//!
//! let reply = server
//!     .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, None)
//!     .await;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod content;
pub mod context;
pub mod dispatch;
pub mod handlers;
pub mod pagination;
pub mod prelude;
pub mod prompt;
pub mod registry;
pub mod resource;
pub mod response;
pub mod server;
pub mod tool;
pub mod uri_template;
pub mod validation;

#[cfg(test)]
mod tests;

pub use builder::McpServerBuilder;
pub use content::{Content, ContentError, ContentKind, ResourceTarget};
pub use context::{RequestContext, RequestKind, ServerMetadata};
pub use dispatch::McpDispatcher;
pub use handlers::McpHandler;
pub use pagination::{Page, paginate};
pub use prompt::McpPrompt;
pub use registry::{
    Handler, HandlerFactory, HandlerLoader, InMemoryHandlerLoader, Registries, Registry,
    ResourceRegistry,
};
pub use resource::McpResource;
pub use response::ResponseBuilder;
pub use server::McpServer;
pub use tool::McpTool;
pub use uri_template::{UriTemplate, UriTemplateError, VariableValue, Variables};
pub use validation::{FieldError, JsonSchemaValidator, Validator};

pub use switchboard_json_rpc::SessionContext;
pub use switchboard_protocol::{McpError, McpResult};

/// Result type for framework operations
pub type Result<T> = std::result::Result<T, McpFrameworkError>;

/// Framework-level errors
#[derive(Debug, thiserror::Error)]
pub enum McpFrameworkError {
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
