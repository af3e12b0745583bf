//! MCP Tool Trait
//!
//! Tools receive the request context (arguments included) and return one or
//! more [`Content`] values, rendered into a `tools/call` result by the router.

use async_trait::async_trait;
use serde_json::Value;

use switchboard_protocol::{McpResult, Meta, Tool, ToolAnnotations};

use crate::content::Content;
use crate::context::RequestContext;

/// High-level trait for implementing MCP tools
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Unique name used by `tools/call`
    fn name(&self) -> &str;

    fn title(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }

    /// JSON schema for the tool's arguments
    fn input_schema(&self) -> Value {
        Tool::empty_input_schema()
    }

    fn output_schema(&self) -> Option<Value> {
        None
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::default()
    }

    fn meta(&self) -> Option<Meta> {
        None
    }

    /// Execute the tool.
    ///
    /// Returning [`McpError::ValidationFailed`](switchboard_protocol::McpError::ValidationFailed)
    /// yields a successful result flagged `isError`, one text block per field message.
    async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>>;

    /// The descriptor listed by `tools/list`
    fn descriptor(&self) -> Tool {
        let mut tool = Tool::new(self.name())
            .with_input_schema(self.input_schema())
            .with_annotations(self.annotations());
        tool.title = self.title().map(str::to_string);
        tool.description = self.description().map(str::to_string);
        tool.output_schema = self.output_schema();
        tool.meta = self.meta();
        tool
    }
}
