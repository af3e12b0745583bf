//! Common re-exports.
//!
//! ```rust
//! use switchboard_protocol::prelude::*;
//! ```

pub use crate::completion::{
    CompleteArgument, CompleteParams, CompleteResult, CompletionContext, CompletionReference,
    CompletionResult,
};
pub use crate::content::{ContentBlock, ResourceContents, ResourceReference};
pub use crate::initialize::{Implementation, InitializeParams, InitializeResult, ServerCapabilities};
pub use crate::meta::{Annotations, ListParams, Meta};
pub use crate::prompts::{Prompt, PromptArgument, PromptMessage, Role};
pub use crate::resources::{Resource, ResourceTemplate};
pub use crate::tools::{CallToolResult, Tool, ToolAnnotations};
pub use crate::version::McpVersion;
pub use crate::{FieldError, McpError, McpResult};
