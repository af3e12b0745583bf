//! The `initialize` handshake: who is talking, which version, which methods.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `clientInfo` / `serverInfo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Implementation {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// `{"listChanged": ...}`, advertised for each registry that has entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCapability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
    /// Resources only; subscriptions are never offered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,
}

/// What the server answers beyond `initialize` and `ping`.
///
/// A method group is advertised exactly when its member is present;
/// `completions` serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ListCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ListCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<ListCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<Map<String, Value>>,
}

impl ServerCapabilities {
    pub fn with_tools(mut self, list_changed: bool) -> Self {
        self.tools = Some(ListCapability {
            list_changed: Some(list_changed),
            subscribe: None,
        });
        self
    }

    pub fn with_resources(mut self, list_changed: bool) -> Self {
        self.resources = Some(ListCapability {
            list_changed: Some(list_changed),
            subscribe: Some(false),
        });
        self
    }

    pub fn with_prompts(mut self, list_changed: bool) -> Self {
        self.prompts = Some(ListCapability {
            list_changed: Some(list_changed),
            subscribe: None,
        });
        self
    }

    pub fn with_completions(mut self) -> Self {
        self.completions = Some(Map::new());
        self
    }

    pub fn supports_completions(&self) -> bool {
        self.completions.is_some()
    }
}

/// Params of an `initialize` request. Client capabilities are accepted
/// but nothing here depends on them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Omitted means "whatever the server prefers"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<Implementation>,
}

/// Result of a successful `initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResult {
    pub fn new(
        protocol_version: impl Into<String>,
        capabilities: ServerCapabilities,
        server_info: Implementation,
    ) -> Self {
        Self {
            protocol_version: protocol_version.into(),
            capabilities,
            server_info,
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions;
        self
    }
}
