//! Rendering handler output into wire results.
//!
//! A [`ResponseBuilder`] is bound to the kind of the request it answers and
//! refuses to render for any other kind.

use serde::Serialize;
use serde_json::Value;

use switchboard_protocol::{
    CallToolResult, ContentBlock, FieldError, GetPromptResult, McpError, McpResult,
    ReadResourceResult,
};

use crate::content::{Content, ResourceTarget};
use crate::context::RequestKind;

#[derive(Debug, Clone, Copy)]
pub struct ResponseBuilder {
    kind: RequestKind,
}

impl ResponseBuilder {
    pub fn new(kind: RequestKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    fn expect(&self, kind: RequestKind) -> McpResult<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(McpError::internal(format!(
                "Response builder for a {} request cannot render a {} result",
                self.kind, kind
            )))
        }
    }

    /// `tools/call` result: `isError` when any content is error content, and
    /// `structuredContent` from the first structured value
    pub fn tool(&self, contents: &[Content]) -> McpResult<CallToolResult> {
        self.expect(RequestKind::Tool)?;

        let blocks = contents
            .iter()
            .map(Content::to_tool)
            .collect::<Result<Vec<_>, _>>()?;
        let structured = contents.iter().find_map(Content::structured_value).cloned();

        let result = if contents.iter().any(Content::is_error) {
            CallToolResult::error(blocks)
        } else {
            CallToolResult::success(blocks)
        };
        Ok(result.with_structured_content(structured))
    }

    /// Validation failures of a tool call: one error text block per field message
    pub fn tool_validation_errors(&self, errors: &[FieldError]) -> McpResult<CallToolResult> {
        self.expect(RequestKind::Tool)?;
        Ok(CallToolResult::error(
            errors
                .iter()
                .map(|e| ContentBlock::text(e.message.clone()))
                .collect(),
        ))
    }

    /// `prompts/get` result: one message per content
    pub fn prompt(
        &self,
        description: Option<String>,
        contents: &[Content],
    ) -> McpResult<GetPromptResult> {
        self.expect(RequestKind::Prompt)?;
        let messages = contents
            .iter()
            .map(Content::to_prompt)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GetPromptResult {
            description,
            messages,
        })
    }

    /// `resources/read` result for the single content a resource returns
    pub fn resource(
        &self,
        content: &Content,
        target: &ResourceTarget,
    ) -> McpResult<ReadResourceResult> {
        self.expect(RequestKind::Resource)?;
        Ok(ReadResourceResult::new(vec![content.to_resource(target)?]))
    }

    /// Serialize a result for initialize, ping and the list methods
    pub fn system<T: Serialize>(&self, result: &T) -> McpResult<Value> {
        self.expect(RequestKind::System)?;
        Ok(serde_json::to_value(result)?)
    }
}
