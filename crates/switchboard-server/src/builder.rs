//! Fluent configuration for [`McpServer`].
//!
//! Registration problems (duplicate names, bad templates, out-of-range
//! annotations) are collected as they happen and reported together by
//! [`McpServerBuilder::build`].

use std::sync::Arc;

use tracing::debug;

use switchboard_protocol::{Annotations, Implementation, McpVersion, ServerCapabilities};

use crate::context::ServerMetadata;
use crate::dispatch::McpDispatcher;
use crate::prompt::McpPrompt;
use crate::registry::{
    Handler, HandlerLoader, InMemoryHandlerLoader, Registries, Registry, ResourceRegistry,
};
use crate::resource::McpResource;
use crate::server::McpServer;
use crate::tool::McpTool;
use crate::{McpFrameworkError, Result};

pub const DEFAULT_PAGE_SIZE: usize = 15;
pub const MAX_PAGE_SIZE: usize = 50;

/// Builder for [`McpServer`]
pub struct McpServerBuilder {
    name: String,
    version: String,
    title: Option<String>,
    instructions: Option<String>,
    protocol_versions: Vec<String>,
    default_page_size: usize,
    max_page_size: usize,
    completions: bool,
    list_changed: bool,
    tools: Registry,
    resources: ResourceRegistry,
    prompts: Registry,
    loader: InMemoryHandlerLoader,
    custom_loader: Option<Arc<dyn HandlerLoader>>,
    validation_errors: Vec<String>,
}

impl Default for McpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl McpServerBuilder {
    pub fn new() -> Self {
        Self {
            name: "switchboard-mcp-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            instructions: None,
            protocol_versions: McpVersion::all_strings(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            completions: false,
            list_changed: false,
            tools: Registry::new(),
            resources: ResourceRegistry::new(),
            prompts: Registry::new(),
            loader: InMemoryHandlerLoader::new(),
            custom_loader: None,
            validation_errors: Vec::new(),
        }
    }

    /// Sets the server name reported in `serverInfo`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the server version string
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the human-readable server title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets usage instructions for MCP clients
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Supported protocol versions, preferred first
    pub fn protocol_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocol_versions = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Page size used when a list request does not ask for one
    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Upper bound on any list page
    pub fn max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }

    /// Advertise `completions` and route `completion/complete`
    pub fn with_completions(mut self) -> Self {
        self.completions = true;
        self
    }

    /// Value of `listChanged` on every advertised capability
    pub fn list_changed(mut self, enabled: bool) -> Self {
        self.list_changed = enabled;
        self
    }

    /// Register a tool instance under its own name
    pub fn tool<T: McpTool + 'static>(mut self, tool: T) -> Self {
        let name = tool.name().to_string();
        if name.is_empty() {
            self.validation_errors
                .push("Tool name cannot be empty".to_string());
            return self;
        }
        let locator = format!("tool:{}", name);
        self.loader
            .insert(locator.clone(), Handler::Tool(Arc::new(tool)));
        self.register_tool(name, locator)
    }

    /// Register a tool by name and locator, resolved by the loader on use
    pub fn tool_locator(self, name: impl Into<String>, locator: impl Into<String>) -> Self {
        self.register_tool(name.into(), locator.into())
    }

    fn register_tool(mut self, name: String, locator: String) -> Self {
        if let Err(e) = self.tools.register(name, locator) {
            self.validation_errors.push(e.to_string());
        }
        self
    }

    /// Register a resource instance under its URI or URI template
    pub fn resource<R: McpResource + 'static>(mut self, resource: R) -> Self {
        let uri = resource.uri().to_string();
        if let Some(Err(message)) = resource.annotations().as_ref().map(validate_annotations) {
            self.validation_errors
                .push(format!("Resource [{}]: {}", uri, message));
            return self;
        }
        let locator = format!("resource:{}", uri);
        self.loader
            .insert(locator.clone(), Handler::Resource(Arc::new(resource)));
        self.register_resource(uri, locator)
    }

    /// Register a resource by pattern and locator, resolved by the loader on use
    pub fn resource_locator(
        self,
        pattern: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        self.register_resource(pattern.into(), locator.into())
    }

    fn register_resource(mut self, pattern: String, locator: String) -> Self {
        if let Err(e) = self.resources.register(pattern, locator) {
            self.validation_errors.push(e.to_string());
        }
        self
    }

    /// Register a prompt instance under its own name
    pub fn prompt<P: McpPrompt + 'static>(mut self, prompt: P) -> Self {
        let name = prompt.name().to_string();
        if name.is_empty() {
            self.validation_errors
                .push("Prompt name cannot be empty".to_string());
            return self;
        }
        let locator = format!("prompt:{}", name);
        self.loader
            .insert(locator.clone(), Handler::Prompt(Arc::new(prompt)));
        self.register_prompt(name, locator)
    }

    /// Register a prompt by name and locator, resolved by the loader on use
    pub fn prompt_locator(self, name: impl Into<String>, locator: impl Into<String>) -> Self {
        self.register_prompt(name.into(), locator.into())
    }

    fn register_prompt(mut self, name: String, locator: String) -> Self {
        if let Err(e) = self.prompts.register(name, locator) {
            self.validation_errors.push(e.to_string());
        }
        self
    }

    /// Loader for locators registered with the `*_locator` methods.
    ///
    /// Instances registered directly are still served from memory first.
    pub fn loader<L: HandlerLoader + 'static>(mut self, loader: L) -> Self {
        self.custom_loader = Some(Arc::new(loader));
        self
    }

    fn capabilities(&self) -> ServerCapabilities {
        let mut capabilities = ServerCapabilities::default();
        if !self.tools.is_empty() {
            capabilities = capabilities.with_tools(self.list_changed);
        }
        if !self.resources.is_empty() {
            capabilities = capabilities.with_resources(self.list_changed);
        }
        if !self.prompts.is_empty() {
            capabilities = capabilities.with_prompts(self.list_changed);
        }
        if self.completions {
            capabilities = capabilities.with_completions();
        }
        capabilities
    }

    /// Validate the configuration and assemble the server
    pub fn build(self) -> Result<McpServer> {
        if self.name.is_empty() {
            return Err(McpFrameworkError::Config(
                "Server name cannot be empty".to_string(),
            ));
        }
        if self.version.is_empty() {
            return Err(McpFrameworkError::Config(
                "Server version cannot be empty".to_string(),
            ));
        }
        if self.protocol_versions.is_empty() {
            return Err(McpFrameworkError::Config(
                "At least one protocol version must be supported".to_string(),
            ));
        }
        if self.max_page_size == 0 {
            return Err(McpFrameworkError::Config(
                "Maximum page size must be at least 1".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(McpFrameworkError::Config(format!(
                "Default page size ({}) must be between 1 and the maximum page size ({})",
                self.default_page_size, self.max_page_size
            )));
        }
        if !self.validation_errors.is_empty() {
            return Err(McpFrameworkError::Config(format!(
                "Registration errors:\n{}",
                self.validation_errors.join("\n")
            )));
        }

        let capabilities = self.capabilities();
        debug!(
            tools = self.tools.len(),
            prompts = self.prompts.len(),
            resources = self.resources.entries().len(),
            completions = self.completions,
            "Building MCP server"
        );

        let mut implementation = Implementation::new(self.name, self.version);
        implementation.title = self.title;

        let metadata = ServerMetadata {
            implementation,
            instructions: self.instructions,
            protocol_versions: self.protocol_versions,
            capabilities,
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        };

        let loader: Arc<dyn HandlerLoader> = match self.custom_loader {
            Some(custom) => Arc::new(self.loader.with_fallback(custom)),
            None => Arc::new(self.loader),
        };
        let registries = Registries::new(self.tools, self.resources, self.prompts, loader);

        Ok(McpServer::new(McpDispatcher::new(metadata, registries)))
    }
}

/// Check annotation ranges: `priority` must lie in [0, 1]
pub fn validate_annotations(annotations: &Annotations) -> std::result::Result<(), String> {
    match annotations.priority {
        Some(priority) if !(0.0..=1.0).contains(&priority) => Err(format!(
            "Annotation priority must be between 0 and 1, got {}",
            priority
        )),
        _ => Ok(()),
    }
}
