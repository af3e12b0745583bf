use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use switchboard_protocol::{
    CompleteParams, CompleteResult, CompletionReference, CompletionResult, McpError, McpResult,
};

use super::McpHandler;
use crate::context::RequestContext;

/// `completion/complete`: argument suggestions for prompts and resource templates.
///
/// Answers method-not-found unless the server advertises the `completions` capability.
pub struct CompletionHandler;

#[async_trait]
impl McpHandler for CompletionHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        if !ctx.capabilities().supports_completions() {
            return Err(McpError::MethodNotFound(ctx.method().to_string()));
        }

        let params: CompleteParams = ctx.params()?;
        let context = params.context.unwrap_or_default();
        let argument = &params.argument;

        let values = match &params.reference {
            CompletionReference::Prompt { name } => {
                let prompt = ctx
                    .registries()
                    .prompt(name)?
                    .ok_or_else(|| McpError::PromptNotFound(name.clone()))?;
                if !prompt.arguments().iter().any(|a| a.name == argument.name) {
                    return Err(McpError::invalid_params(format!(
                        "Argument [{}] not found on prompt [{}].",
                        argument.name, name
                    )));
                }
                prompt
                    .complete(&argument.name, &argument.value, &context)
                    .await?
            }
            CompletionReference::Resource { uri } => {
                let registries = ctx.registries();
                let resource = match registries.resource_by_pattern(uri)? {
                    Some(resource) => resource,
                    None => registries
                        .resolve_resource(uri)?
                        .map(|resolved| resolved.handler().clone())
                        .ok_or_else(|| {
                            McpError::invalid_params(format!("Resource [{}] not found.", uri))
                        })?,
                };
                resource
                    .complete(&argument.name, &argument.value, &context)
                    .await?
            }
        };

        debug!(argument = %argument.name, suggestions = values.len(), "Completed argument");
        ctx.response().system(&CompleteResult {
            completion: CompletionResult::from_values(values),
        })
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["completion/complete".to_string()]
    }
}
