use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use switchboard_protocol::{
    CallToolParams, ListParams, ListToolsResult, McpError, McpResult, Tool,
};

use super::McpHandler;
use crate::context::RequestContext;
use crate::pagination::paginate;

/// `tools/list`
pub struct ToolsListHandler;

#[async_trait]
impl McpHandler for ToolsListHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        let params: ListParams = ctx.params()?;
        let tools: Vec<Tool> = ctx
            .registries()
            .tools()?
            .iter()
            .map(|tool| tool.descriptor())
            .collect();

        let page = paginate(
            &tools,
            ctx.per_page(params.per_page),
            params.cursor.as_deref(),
        );
        debug!(returned = page.items.len(), total = tools.len(), "Listing tools");

        ctx.response().system(&ListToolsResult {
            tools: page.items,
            next_cursor: page.next_cursor,
        })
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["tools/list".to_string()]
    }
}

/// `tools/call`
pub struct ToolsCallHandler;

#[async_trait]
impl McpHandler for ToolsCallHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        let params: CallToolParams = ctx.params()?;
        let tool = ctx
            .registries()
            .tool(&params.name)?
            .ok_or_else(|| McpError::ToolNotFound(params.name.clone()))?;

        let tool_ctx = ctx.for_tool(params.arguments.unwrap_or_default());
        debug!(tool = %params.name, "Calling tool");

        let result = match tool.call(&tool_ctx).await {
            Ok(mut contents) => {
                for content in contents.iter_mut() {
                    content.pre_process(&tool_ctx).await?;
                }
                tool_ctx.response().tool(&contents)?
            }
            Err(McpError::ValidationFailed(errors)) => {
                debug!(tool = %params.name, errors = errors.len(), "Tool arguments rejected");
                tool_ctx.response().tool_validation_errors(&errors)?
            }
            Err(e) => return Err(e),
        };

        Ok(serde_json::to_value(result)?)
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["tools/call".to_string()]
    }
}
