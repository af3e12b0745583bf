//! # Switchboard MCP Protocol Types
//!
//! Wire types for the Model Context Protocol methods served by the
//! Switchboard engine, plus [`McpError`], the typed protocol error every
//! handler raises and the router converts into a JSON-RPC error envelope.
//!
//! ## Coverage
//! - `initialize` handshake and nested server capabilities
//! - `tools/*`, `resources/*`, `prompts/*` descriptors, params and results
//! - `completion/complete`
//! - Content blocks and resource contents shared by all of the above

pub mod completion;
pub mod content;
pub mod initialize;
pub mod meta;
pub mod ping;
pub mod prelude;
pub mod prompts;
pub mod resources;
pub mod tools;
pub mod version;

pub use completion::{
    CompleteArgument, CompleteParams, CompleteResult, CompletionContext, CompletionReference,
    CompletionResult,
};
pub use content::{BlockBody, ContentBlock, ResourceBody, ResourceContents, ResourceReference};
pub use initialize::{
    Implementation, InitializeParams, InitializeResult, ListCapability, ServerCapabilities,
};
pub use meta::{Annotations, ListParams, Meta};
pub use ping::EmptyResult;
pub use prompts::{
    GetPromptParams, GetPromptResult, ListPromptsResult, Prompt, PromptArgument, PromptMessage,
    Role,
};
pub use resources::{
    ListResourceTemplatesResult, ListResourcesResult, ReadResourceParams, ReadResourceResult,
    Resource, ResourceTemplate,
};
pub use tools::{CallToolParams, CallToolResult, ListToolsResult, Tool, ToolAnnotations};
pub use version::McpVersion;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use switchboard_json_rpc::{JsonRpcError, JsonRpcErrorObject, RequestId, error_codes};

/// One failed field from input validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Summary line for a list of field errors: the first message, plus a count of the rest
fn summarize_field_errors(errors: &[FieldError]) -> String {
    match errors {
        [] => "The given data was invalid.".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!(
            "{} (and {} more error{})",
            first.message,
            rest.len(),
            if rest.len() == 1 { "" } else { "s" }
        ),
    }
}

/// Common result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// `resources/read` named a URI no registered resource answers
pub const RESOURCE_NOT_FOUND: i64 = -32002;
/// The server was assembled with an invalid registration or setting
pub const CONFIGURATION_ERROR: i64 = -32030;

/// Errors raised by handlers, each mapped onto one JSON-RPC error code
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("Method '{0}' not found")]
    MethodNotFound(String),

    #[error("Unsupported protocol version [{requested}].")]
    UnsupportedProtocolVersion {
        requested: String,
        supported: Vec<String>,
    },

    #[error("Tool [{0}] not found.")]
    ToolNotFound(String),

    #[error("Resource [{0}] not found.")]
    ResourceNotFound(String),

    #[error("Prompt [{0}] not found.")]
    PromptNotFound(String),

    #[error("{0}")]
    InvalidParameters(String),

    /// Input validation rejected one or more fields
    #[error("{}", summarize_field_errors(.0))]
    ValidationFailed(Vec<FieldError>),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A failure with no more specific code; surfaces as -32603
    #[error("{0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A handler-chosen code, message and data, sent as given
    #[error("Error {code}: {message}")]
    Coded {
        code: i64,
        message: String,
        data: Option<Value>,
    },
}

impl McpError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::ValidationFailed(errors)
    }

    pub fn configuration(message: &str) -> Self {
        Self::ConfigurationError(message.to_string())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// An error with an application-specific code
    pub fn coded(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::Coded {
            code,
            message: message.into(),
            data,
        }
    }

    /// The `error` member this error is sent as
    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            McpError::MethodNotFound(method) => JsonRpcErrorObject::method_not_found(method),

            McpError::UnsupportedProtocolVersion {
                requested,
                supported,
            } => JsonRpcErrorObject::invalid_params(self.to_string()).with_data(json!({
                "supported": supported,
                "requested": requested,
            })),

            // Unknown tools and prompts are parameter problems; unknown resources
            // carry their own application code
            McpError::ToolNotFound(_) | McpError::PromptNotFound(_) => {
                JsonRpcErrorObject::invalid_params(self.to_string())
            }
            McpError::ResourceNotFound(_) => {
                JsonRpcErrorObject::server_error(RESOURCE_NOT_FOUND, self.to_string())
            }

            McpError::InvalidParameters(_) => JsonRpcErrorObject::invalid_params(self.to_string()),
            McpError::ValidationFailed(errors) => {
                JsonRpcErrorObject::invalid_params(self.to_string())
                    .with_data(json!({ "errors": errors }))
            }

            McpError::ConfigurationError(_) => {
                JsonRpcErrorObject::server_error(CONFIGURATION_ERROR, self.to_string())
            }

            McpError::Internal(message) => JsonRpcErrorObject::internal_error(message.clone()),
            McpError::SerializationError(_) => JsonRpcErrorObject::internal_error(self.to_string()),

            McpError::Coded {
                code,
                message,
                data,
            } => JsonRpcErrorObject {
                code: *code,
                message: message.clone(),
                data: data.clone(),
            },
        }
    }

    /// The error envelope answering request `id`
    pub fn to_json_rpc_response(&self, id: Option<RequestId>) -> JsonRpcError {
        JsonRpcError::new(id, self.to_error_object())
    }

    /// Whether this error maps onto the invalid-params code
    pub fn is_invalid_params(&self) -> bool {
        self.to_error_object().code == error_codes::INVALID_PARAMS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_codes() {
        assert_eq!(
            McpError::ResourceNotFound("file:///x".into())
                .to_error_object()
                .code,
            RESOURCE_NOT_FOUND
        );
        let tool = McpError::ToolNotFound("calc".into()).to_error_object();
        assert_eq!(tool.code, error_codes::INVALID_PARAMS);
        assert_eq!(tool.message, "Tool [calc] not found.");
    }

    #[test]
    fn test_unsupported_version_carries_data() {
        let err = McpError::UnsupportedProtocolVersion {
            requested: "1999-01-01".into(),
            supported: vec!["2025-06-18".into()],
        };
        let object = err.to_error_object();
        assert_eq!(object.code, error_codes::INVALID_PARAMS);
        assert!(object.message.contains("1999-01-01"));
        let data = object.data.unwrap();
        assert_eq!(data["requested"], "1999-01-01");
        assert_eq!(data["supported"][0], "2025-06-18");
    }

    #[test]
    fn test_coded_error_is_sent_as_given() {
        let object = McpError::coded(-31000, "custom", Some(json!({"k": 1}))).to_error_object();
        assert_eq!(object.code, -31000);
        assert_eq!(object.message, "custom");
        assert_eq!(object.data, Some(json!({"k": 1})));
    }

    #[test]
    fn test_validation_failure_summarizes_fields() {
        let err = McpError::validation(vec![
            FieldError::new("a", "The a field is required."),
            FieldError::new("b", "The b field must be a string."),
        ]);
        let object = err.to_error_object();
        assert_eq!(object.code, error_codes::INVALID_PARAMS);
        assert_eq!(object.message, "The a field is required. (and 1 more error)");
        assert_eq!(object.data.unwrap()["errors"][1]["field"], "b");
    }

    #[test]
    fn test_method_not_found() {
        let response = McpError::MethodNotFound("completion/complete".into())
            .to_json_rpc_response(Some(RequestId::Number(4)));
        assert_eq!(response.error.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(response.id, Some(RequestId::Number(4)));
    }
}
