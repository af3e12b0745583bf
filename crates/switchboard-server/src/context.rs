//! Per-request execution context.
//!
//! The router builds a fresh [`RequestContext`] for every request. Handlers
//! derive scoped children from it (`for_tool`, `for_prompt`, `for_resource`)
//! which carry the entity's argument bag and a response builder bound to the
//! entity kind.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use switchboard_json_rpc::{JsonRpcRequest, RequestId, SessionContext};
use switchboard_protocol::{Implementation, McpError, McpResult, ServerCapabilities};

use crate::registry::{Registries, ResolvedResource};
use crate::response::ResponseBuilder;
use crate::validation::Validator;

/// Server-wide settings shared by every request
#[derive(Debug, Clone)]
pub struct ServerMetadata {
    pub implementation: Implementation,
    pub instructions: Option<String>,
    /// Supported protocol versions, preferred first
    pub protocol_versions: Vec<String>,
    pub capabilities: ServerCapabilities,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

/// What a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// initialize, ping and the list methods
    System,
    Tool,
    Resource,
    Prompt,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::System => "system",
            RequestKind::Tool => "tool",
            RequestKind::Resource => "resource",
            RequestKind::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

/// Immutable per-request bundle handed to handlers
#[derive(Clone)]
pub struct RequestContext {
    metadata: Arc<ServerMetadata>,
    registries: Arc<Registries>,
    request: Arc<JsonRpcRequest>,
    session: Option<SessionContext>,
    kind: RequestKind,
    arguments: Map<String, Value>,
}

impl RequestContext {
    pub fn new(
        metadata: Arc<ServerMetadata>,
        registries: Arc<Registries>,
        request: JsonRpcRequest,
        session: Option<SessionContext>,
    ) -> Self {
        let arguments = match request.params_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            metadata,
            registries,
            request: Arc::new(request),
            session,
            kind: RequestKind::System,
            arguments,
        }
    }

    fn scoped(&self, kind: RequestKind, arguments: Map<String, Value>) -> Self {
        Self {
            metadata: Arc::clone(&self.metadata),
            registries: Arc::clone(&self.registries),
            request: Arc::clone(&self.request),
            session: self.session.clone(),
            kind,
            arguments,
        }
    }

    /// Child context for a tool call
    pub fn for_tool(&self, arguments: Map<String, Value>) -> Self {
        self.scoped(RequestKind::Tool, arguments)
    }

    /// Child context for a prompt fetch
    pub fn for_prompt(&self, arguments: Map<String, Value>) -> Self {
        self.scoped(RequestKind::Prompt, arguments)
    }

    /// Child context for reading a resolved resource; its arguments are the
    /// variables matched from the URI
    pub fn for_resource(&self, resolved: &ResolvedResource) -> Self {
        self.scoped(RequestKind::Resource, resolved.arguments())
    }

    pub fn metadata(&self) -> &ServerMetadata {
        &self.metadata
    }

    pub fn server_info(&self) -> &Implementation {
        &self.metadata.implementation
    }

    pub fn instructions(&self) -> Option<&str> {
        self.metadata.instructions.as_deref()
    }

    pub fn protocol_versions(&self) -> &[String] {
        &self.metadata.protocol_versions
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.metadata.capabilities
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn request(&self) -> &JsonRpcRequest {
        &self.request
    }

    pub fn method(&self) -> &str {
        &self.request.method
    }

    pub fn id(&self) -> &RequestId {
        &self.request.id
    }

    pub fn session(&self) -> Option<&SessionContext> {
        self.session.as_ref()
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The argument bag: request params for system requests, entity arguments otherwise
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// String argument, if present and a string
    pub fn str_argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(Value::as_str)
    }

    /// Deserialize the argument bag
    pub fn arguments_as<T: DeserializeOwned>(&self) -> McpResult<T> {
        serde_json::from_value(Value::Object(self.arguments.clone()))
            .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {}", e)))
    }

    /// Deserialize the request params (absent params read as `{}`)
    pub fn params<T: DeserializeOwned>(&self) -> McpResult<T> {
        serde_json::from_value(self.request.params_value()).map_err(|e| {
            McpError::invalid_params(format!("Invalid params for {}: {}", self.method(), e))
        })
    }

    pub fn default_page_size(&self) -> usize {
        self.metadata.default_page_size
    }

    pub fn max_page_size(&self) -> usize {
        self.metadata.max_page_size
    }

    /// Page size for a list request: the requested size (or the default)
    /// capped at the maximum, and never zero
    pub fn per_page(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.metadata.default_page_size)
            .min(self.metadata.max_page_size)
            .max(1)
    }

    /// Response builder scoped to this context's kind
    pub fn response(&self) -> ResponseBuilder {
        ResponseBuilder::new(self.kind)
    }

    /// Validate the argument bag, returning the validated value
    pub fn validate(&self, validator: &dyn Validator) -> McpResult<Value> {
        validator
            .validate(&Value::Object(self.arguments.clone()))
            .map_err(McpError::validation)
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.request.method)
            .field("id", &self.request.id)
            .field("kind", &self.kind)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
