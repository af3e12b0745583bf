//! Registries and handler loading.
//!
//! Each registry is an ordered map from a name (or, for resources, a literal
//! URI or URI template) to a locator. Locators are opaque strings turned into
//! handlers by a [`HandlerLoader`]; listing order is registration order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use switchboard_protocol::{McpError, McpResult, ResourceReference};

use crate::content::ResourceTarget;
use crate::prompt::McpPrompt;
use crate::resource::McpResource;
use crate::tool::McpTool;
use crate::uri_template::{UriTemplate, UriTemplateError, Variables};

/// A loaded handler of any kind
#[derive(Clone)]
pub enum Handler {
    Tool(Arc<dyn McpTool>),
    Resource(Arc<dyn McpResource>),
    Prompt(Arc<dyn McpPrompt>),
}

impl Handler {
    fn kind(&self) -> &'static str {
        match self {
            Handler::Tool(_) => "tool",
            Handler::Resource(_) => "resource",
            Handler::Prompt(_) => "prompt",
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.kind()).finish()
    }
}

/// Resolves locators to handlers
pub trait HandlerLoader: Send + Sync {
    fn load(&self, locator: &str) -> McpResult<Handler>;
}

/// Produces a handler on each load
pub type HandlerFactory = Arc<dyn Fn() -> Handler + Send + Sync>;

/// A [`HandlerLoader`] backed by factories registered up front, with an
/// optional fallback for locators it does not know
#[derive(Default, Clone)]
pub struct InMemoryHandlerLoader {
    factories: HashMap<String, HandlerFactory>,
    fallback: Option<Arc<dyn HandlerLoader>>,
}

impl InMemoryHandlerLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory invoked on every load of `locator`
    pub fn register<F>(&mut self, locator: impl Into<String>, factory: F)
    where
        F: Fn() -> Handler + Send + Sync + 'static,
    {
        self.factories.insert(locator.into(), Arc::new(factory));
    }

    /// Register a shared handler instance
    pub fn insert(&mut self, locator: impl Into<String>, handler: Handler) {
        self.register(locator, move || handler.clone());
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn HandlerLoader>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn contains(&self, locator: &str) -> bool {
        self.factories.contains_key(locator)
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl HandlerLoader for InMemoryHandlerLoader {
    fn load(&self, locator: &str) -> McpResult<Handler> {
        if let Some(factory) = self.factories.get(locator) {
            return Ok(factory());
        }
        match &self.fallback {
            Some(fallback) => fallback.load(locator),
            None => Err(McpError::configuration(&format!(
                "No handler registered for locator [{}]",
                locator
            ))),
        }
    }
}

/// One registration: key and locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub key: String,
    pub locator: String,
}

/// Ordered name → locator map for tools and prompts
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; duplicate keys are rejected
    pub fn register(
        &mut self,
        key: impl Into<String>,
        locator: impl Into<String>,
    ) -> McpResult<()> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(McpError::configuration(&format!(
                "Duplicate registration for [{}]",
                key
            )));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(RegistryEntry {
            key,
            locator: locator.into(),
        });
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resource registration; templated keys carry their compiled template
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub key: String,
    pub locator: String,
    template: Option<UriTemplate>,
}

impl ResourceEntry {
    pub fn template(&self) -> Option<&UriTemplate> {
        self.template.as_ref()
    }

    pub fn is_template(&self) -> bool {
        self.template.is_some()
    }
}

/// Ordered pattern → locator map for resources.
///
/// Lookup tries literal URIs first, then templates in registration order.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    entries: Vec<ResourceEntry>,
    index: HashMap<String, usize>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a literal URI or template; templates are compiled here
    pub fn register(
        &mut self,
        pattern: impl Into<String>,
        locator: impl Into<String>,
    ) -> McpResult<()> {
        let key = pattern.into();
        if self.index.contains_key(&key) {
            return Err(McpError::configuration(&format!(
                "Duplicate registration for [{}]",
                key
            )));
        }
        // Any brace is template syntax, so a malformed template is an error
        // rather than a literal URI
        let template = if key.contains('{') {
            let parsed = UriTemplate::parse(&key).map_err(|e| {
                McpError::configuration(&format!("Invalid URI template [{}]: {}", key, e))
            })?;
            Some(parsed)
        } else {
            None
        };
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(ResourceEntry {
            key,
            locator: locator.into(),
            template,
        });
        Ok(())
    }

    /// Entry registered under exactly this key
    pub fn get(&self, key: &str) -> Option<&ResourceEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Find the entry answering `uri` and the variables it binds
    pub fn lookup(&self, uri: &str) -> Result<Option<(&ResourceEntry, Variables)>, UriTemplateError> {
        if let Some(entry) = self.get(uri).filter(|e| !e.is_template()) {
            return Ok(Some((entry, Variables::new())));
        }
        for entry in &self.entries {
            let Some(template) = &entry.template else {
                continue;
            };
            if let Some(variables) = template.match_uri(uri)? {
                return Ok(Some((entry, variables)));
            }
        }
        Ok(None)
    }

    pub fn literals(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.iter().filter(|e| !e.is_template())
    }

    pub fn templates(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.iter().filter(|e| e.is_template())
    }

    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resource handler matched against a concrete URI
#[derive(Clone)]
pub struct ResolvedResource {
    handler: Arc<dyn McpResource>,
    uri: String,
    variables: Variables,
}

impl ResolvedResource {
    pub fn handler(&self) -> &Arc<dyn McpResource> {
        &self.handler
    }

    /// The concrete URI that was requested
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Variables as a JSON argument bag
    pub fn arguments(&self) -> Map<String, Value> {
        self.variables
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }

    pub fn target(&self) -> ResourceTarget {
        ResourceTarget::new(
            self.uri.clone(),
            self.handler.mime_type().map(str::to_string),
        )
    }

    /// Link descriptor pointing at the concrete URI
    pub fn reference(&self) -> ResourceReference {
        ResourceReference {
            uri: self.uri.clone(),
            name: self.handler.name().to_string(),
            title: self.handler.title().map(str::to_string),
            description: self.handler.description().map(str::to_string),
            mime_type: self.handler.mime_type().map(str::to_string),
            size: self.handler.size(),
        }
    }
}

/// All three registries plus the loader that instantiates their handlers
#[derive(Clone)]
pub struct Registries {
    tools: Registry,
    resources: ResourceRegistry,
    prompts: Registry,
    loader: Arc<dyn HandlerLoader>,
}

impl Registries {
    pub fn new(
        tools: Registry,
        resources: ResourceRegistry,
        prompts: Registry,
        loader: Arc<dyn HandlerLoader>,
    ) -> Self {
        Self {
            tools,
            resources,
            prompts,
            loader,
        }
    }

    pub fn tool_registry(&self) -> &Registry {
        &self.tools
    }

    pub fn resource_registry(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn prompt_registry(&self) -> &Registry {
        &self.prompts
    }

    pub fn load_tool(&self, locator: &str) -> McpResult<Arc<dyn McpTool>> {
        match self.loader.load(locator)? {
            Handler::Tool(tool) => Ok(tool),
            other => Err(mismatch(locator, "tool", &other)),
        }
    }

    pub fn load_resource(&self, locator: &str) -> McpResult<Arc<dyn McpResource>> {
        match self.loader.load(locator)? {
            Handler::Resource(resource) => Ok(resource),
            other => Err(mismatch(locator, "resource", &other)),
        }
    }

    pub fn load_prompt(&self, locator: &str) -> McpResult<Arc<dyn McpPrompt>> {
        match self.loader.load(locator)? {
            Handler::Prompt(prompt) => Ok(prompt),
            other => Err(mismatch(locator, "prompt", &other)),
        }
    }

    /// Tool registered under `name`
    pub fn tool(&self, name: &str) -> McpResult<Option<Arc<dyn McpTool>>> {
        self.tools
            .get(name)
            .map(|entry| self.load_tool(&entry.locator))
            .transpose()
    }

    /// Prompt registered under `name`
    pub fn prompt(&self, name: &str) -> McpResult<Option<Arc<dyn McpPrompt>>> {
        self.prompts
            .get(name)
            .map(|entry| self.load_prompt(&entry.locator))
            .transpose()
    }

    /// Every tool in registration order
    pub fn tools(&self) -> McpResult<Vec<Arc<dyn McpTool>>> {
        self.tools
            .entries()
            .iter()
            .map(|entry| self.load_tool(&entry.locator))
            .collect()
    }

    /// Every prompt in registration order
    pub fn prompts(&self) -> McpResult<Vec<Arc<dyn McpPrompt>>> {
        self.prompts
            .entries()
            .iter()
            .map(|entry| self.load_prompt(&entry.locator))
            .collect()
    }

    /// Every literal-URI resource in registration order
    pub fn resources(&self) -> McpResult<Vec<Arc<dyn McpResource>>> {
        self.resources
            .literals()
            .map(|entry| self.load_resource(&entry.locator))
            .collect()
    }

    /// Every templated resource in registration order
    pub fn resource_templates(&self) -> McpResult<Vec<Arc<dyn McpResource>>> {
        self.resources
            .templates()
            .map(|entry| self.load_resource(&entry.locator))
            .collect()
    }

    /// Resource registered under exactly this URI or template
    pub fn resource_by_pattern(&self, pattern: &str) -> McpResult<Option<Arc<dyn McpResource>>> {
        self.resources
            .get(pattern)
            .map(|entry| self.load_resource(&entry.locator))
            .transpose()
    }

    /// Resolve a concrete URI: literal entries first, then templates in order
    pub fn resolve_resource(&self, uri: &str) -> McpResult<Option<ResolvedResource>> {
        let found = self
            .resources
            .lookup(uri)
            .map_err(|e| McpError::invalid_params(e.to_string()))?;

        let Some((entry, variables)) = found else {
            debug!(uri, "No resource matches URI");
            return Ok(None);
        };

        debug!(uri, pattern = %entry.key, "Resolved resource");
        Ok(Some(ResolvedResource {
            handler: self.load_resource(&entry.locator)?,
            uri: uri.to_string(),
            variables,
        }))
    }
}

impl fmt::Debug for Registries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registries")
            .field("tools", &self.tools)
            .field("resources", &self.resources)
            .field("prompts", &self.prompts)
            .finish_non_exhaustive()
    }
}

fn mismatch(locator: &str, expected: &str, found: &Handler) -> McpError {
    McpError::configuration(&format!(
        "Locator [{}] resolves to a {}, expected a {}",
        locator,
        found.kind(),
        expected
    ))
}
