//! Method handlers.
//!
//! One handler per protocol method; the dispatcher indexes them by
//! [`McpHandler::supported_methods`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use switchboard_protocol::McpResult;

use crate::context::RequestContext;

mod completion;
mod initialize;
mod ping;
mod prompts;
mod resources;
mod tools;

pub use completion::CompletionHandler;
pub use initialize::{InitializeHandler, negotiate_protocol_version};
pub use ping::PingHandler;
pub use prompts::{PromptsGetHandler, PromptsListHandler};
pub use resources::{ResourceTemplatesHandler, ResourcesListHandler, ResourcesReadHandler};
pub use tools::{ToolsCallHandler, ToolsListHandler};

/// Handles one or more protocol methods
#[async_trait]
pub trait McpHandler: Send + Sync {
    /// Answer a request; the context carries params, registries and server settings
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value>;

    /// Methods this handler answers
    fn supported_methods(&self) -> Vec<String>;
}

/// The static method table, in no particular order
pub fn standard_handlers() -> Vec<Arc<dyn McpHandler>> {
    vec![
        Arc::new(InitializeHandler),
        Arc::new(PingHandler),
        Arc::new(ToolsListHandler),
        Arc::new(ToolsCallHandler),
        Arc::new(ResourcesListHandler),
        Arc::new(ResourceTemplatesHandler),
        Arc::new(ResourcesReadHandler),
        Arc::new(PromptsListHandler),
        Arc::new(PromptsGetHandler),
        Arc::new(CompletionHandler),
    ]
}
