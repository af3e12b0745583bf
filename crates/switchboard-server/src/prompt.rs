//! MCP Prompt Trait

use async_trait::async_trait;
use serde_json::{Map, Value};

use switchboard_protocol::{
    CompletionContext, FieldError, McpError, McpResult, Meta, Prompt, PromptArgument,
};

use crate::content::Content;
use crate::context::RequestContext;

/// High-level trait for implementing MCP prompts
///
/// The router checks required arguments before `get` runs; each returned
/// [`Content`] becomes one prompt message.
#[async_trait]
pub trait McpPrompt: Send + Sync {
    fn name(&self) -> &str;

    fn title(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        Vec::new()
    }

    fn meta(&self) -> Option<Meta> {
        None
    }

    /// Render the prompt's messages
    async fn get(&self, ctx: &RequestContext) -> McpResult<Vec<Content>>;

    /// Suggestions for one of the declared arguments; none by default
    async fn complete(
        &self,
        _argument: &str,
        _value: &str,
        _context: &CompletionContext,
    ) -> McpResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// Descriptor for `prompts/list`
    fn descriptor(&self) -> Prompt {
        let mut prompt = Prompt::new(self.name());
        prompt.title = self.title().map(str::to_string);
        prompt.description = self.description().map(str::to_string);
        prompt.arguments = self.arguments();
        prompt.meta = self.meta();
        prompt
    }

    /// Fail with one field error per required argument that is absent or null
    fn check_required(&self, arguments: &Map<String, Value>) -> McpResult<()> {
        let missing: Vec<FieldError> = self
            .arguments()
            .into_iter()
            .filter(|arg| arg.required)
            .filter(|arg| arguments.get(&arg.name).is_none_or(Value::is_null))
            .map(|arg| {
                let message = format!("The {} argument is required.", arg.name);
                FieldError::new(arg.name, message)
            })
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(McpError::validation(missing))
        }
    }
}
