use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use switchboard_protocol::{
    GetPromptParams, ListParams, ListPromptsResult, McpError, McpResult, Prompt,
};

use super::McpHandler;
use crate::context::RequestContext;
use crate::pagination::paginate;

/// `prompts/list`
pub struct PromptsListHandler;

#[async_trait]
impl McpHandler for PromptsListHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        let params: ListParams = ctx.params()?;
        let prompts: Vec<Prompt> = ctx
            .registries()
            .prompts()?
            .iter()
            .map(|prompt| prompt.descriptor())
            .collect();

        let page = paginate(
            &prompts,
            ctx.per_page(params.per_page),
            params.cursor.as_deref(),
        );

        ctx.response().system(&ListPromptsResult {
            prompts: page.items,
            next_cursor: page.next_cursor,
        })
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["prompts/list".to_string()]
    }
}

/// `prompts/get`
pub struct PromptsGetHandler;

#[async_trait]
impl McpHandler for PromptsGetHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        let params: GetPromptParams = ctx.params()?;
        let prompt = ctx
            .registries()
            .prompt(&params.name)?
            .ok_or_else(|| McpError::PromptNotFound(params.name.clone()))?;

        let arguments = params.arguments.unwrap_or_default();
        prompt.check_required(&arguments)?;

        let prompt_ctx = ctx.for_prompt(arguments);
        debug!(prompt = %params.name, "Rendering prompt");

        let mut contents = prompt.get(&prompt_ctx).await?;
        for content in contents.iter_mut() {
            content.pre_process(&prompt_ctx).await?;
        }

        let result = prompt_ctx
            .response()
            .prompt(prompt.description().map(str::to_string), &contents)?;
        Ok(serde_json::to_value(result)?)
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["prompts/get".to_string()]
    }
}
