//! Common re-exports for writing tools, resources and prompts.
//!
//! ```rust
//! use switchboard_server::prelude::*;
//! ```

pub use crate::content::{Content, ResourceTarget};
pub use crate::context::RequestContext;
pub use crate::prompt::McpPrompt;
pub use crate::resource::McpResource;
pub use crate::server::McpServer;
pub use crate::tool::McpTool;
pub use crate::validation::{FieldError, JsonSchemaValidator, Validator};

pub use switchboard_protocol::prelude::*;
