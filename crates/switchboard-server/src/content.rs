//! Polymorphic handler output.
//!
//! A [`Content`] is produced once by business logic and rendered according to
//! what the request asked for: a tool result block, a prompt message or the
//! contents of a resource read. Combinations that make no sense for a target
//! fail with a [`ContentError`] naming the conversion.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use switchboard_protocol::{
    ContentBlock, McpError, McpResult, Meta, PromptMessage, ResourceContents, ResourceReference,
    Role,
};

use crate::context::RequestContext;

/// Where a resource rendering lands: the concrete URI read and the resource's mime type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTarget {
    pub uri: String,
    pub mime_type: Option<String>,
}

impl ResourceTarget {
    pub fn new(uri: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type,
        }
    }
}

/// A conversion that cannot be performed
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{content} content may not be used in {target}")]
    Unsupported {
        content: &'static str,
        target: &'static str,
    },

    /// Link and embedded content rendered before `pre_process` resolved them
    #[error("Resource [{0}] not found.")]
    Unresolved(String),

    /// Error content rendered as a resource read
    #[error("{0}")]
    Failure(String),

    #[error("Failed to encode structured content: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ContentError> for McpError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Unresolved(uri) => McpError::ResourceNotFound(uri),
            ContentError::Serialization(e) => McpError::SerializationError(e),
            other => McpError::Internal(other.to_string()),
        }
    }
}

/// The payload of a [`Content`]
#[derive(Debug, Clone, PartialEq)]
pub enum ContentKind {
    Text(String),
    /// Base64-encoded bytes
    Blob(String),
    Image {
        data: String,
        mime_type: String,
    },
    Audio {
        data: String,
        mime_type: String,
    },
    Structured(Value),
    Error(String),
    ResourceLink {
        uri: String,
        resolved: Option<ResourceReference>,
    },
    EmbeddedResource {
        uri: String,
        resolved: Option<ResourceContents>,
    },
}

impl ContentKind {
    fn label(&self) -> &'static str {
        match self {
            ContentKind::Text(_) => "Text",
            ContentKind::Blob(_) => "Blob",
            ContentKind::Image { .. } => "Image",
            ContentKind::Audio { .. } => "Audio",
            ContentKind::Structured(_) => "Structured",
            ContentKind::Error(_) => "Error",
            ContentKind::ResourceLink { .. } => "Resource link",
            ContentKind::EmbeddedResource { .. } => "Embedded resource",
        }
    }
}

/// A single piece of handler output
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    kind: ContentKind,
    meta: Option<Meta>,
    role: Role,
}

impl Content {
    fn from_kind(kind: ContentKind) -> Self {
        Self {
            kind,
            meta: None,
            role: Role::User,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::from_kind(ContentKind::Text(text.into()))
    }

    /// Raw bytes, stored base64-encoded
    pub fn blob(bytes: impl AsRef<[u8]>) -> Self {
        Self::from_kind(ContentKind::Blob(STANDARD.encode(bytes)))
    }

    pub fn image(bytes: impl AsRef<[u8]>, mime_type: impl Into<String>) -> Self {
        Self::from_kind(ContentKind::Image {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        })
    }

    pub fn audio(bytes: impl AsRef<[u8]>, mime_type: impl Into<String>) -> Self {
        Self::from_kind(ContentKind::Audio {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        })
    }

    pub fn structured(value: Value) -> Self {
        Self::from_kind(ContentKind::Structured(value))
    }

    /// Structured content from any serializable value
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ContentError> {
        Ok(Self::structured(serde_json::to_value(value)?))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::from_kind(ContentKind::Error(message.into()))
    }

    /// A link to a registered resource, described by its descriptor once resolved
    pub fn resource_link(uri: impl Into<String>) -> Self {
        Self::from_kind(ContentKind::ResourceLink {
            uri: uri.into(),
            resolved: None,
        })
    }

    /// A registered resource whose contents are inlined once resolved
    pub fn embedded_resource(uri: impl Into<String>) -> Self {
        Self::from_kind(ContentKind::EmbeddedResource {
            uri: uri.into(),
            resolved: None,
        })
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Add a single `_meta` entry
    pub fn with_meta_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta
            .get_or_insert_with(Meta::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn as_assistant(self) -> Self {
        self.with_role(Role::Assistant)
    }

    pub fn kind(&self) -> &ContentKind {
        &self.kind
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether rendering this as a tool result marks the result `isError`
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ContentKind::Error(_))
    }

    /// Whether link or embedded content has been resolved (always true for other kinds)
    pub fn is_resolved(&self) -> bool {
        match &self.kind {
            ContentKind::ResourceLink { resolved, .. } => resolved.is_some(),
            ContentKind::EmbeddedResource { resolved, .. } => resolved.is_some(),
            _ => true,
        }
    }

    fn unsupported(&self, target: &'static str) -> ContentError {
        ContentError::Unsupported {
            content: self.kind.label(),
            target,
        }
    }

    /// Resolve link and embedded content against the registered resources.
    ///
    /// A link takes the target's descriptor; embedded content invokes the
    /// target's handler and keeps its resource rendering. Other kinds are
    /// left untouched, as is content that is already resolved.
    pub async fn pre_process(&mut self, ctx: &RequestContext) -> McpResult<()> {
        match &mut self.kind {
            ContentKind::ResourceLink { uri, resolved } if resolved.is_none() => {
                let found = ctx
                    .registries()
                    .resolve_resource(uri)?
                    .ok_or_else(|| McpError::ResourceNotFound(uri.clone()))?;
                *resolved = Some(found.reference());
            }
            ContentKind::EmbeddedResource { uri, resolved } if resolved.is_none() => {
                let found = ctx
                    .registries()
                    .resolve_resource(uri)?
                    .ok_or_else(|| McpError::ResourceNotFound(uri.clone()))?;
                let child = ctx.for_resource(&found);
                let content = found.handler().read(&child).await?;
                *resolved = Some(content.to_resource(&found.target())?);
            }
            _ => {}
        }
        Ok(())
    }

    /// Render as a block inside a tool result
    pub fn to_tool(&self) -> Result<ContentBlock, ContentError> {
        let block = match &self.kind {
            ContentKind::Text(text) | ContentKind::Error(text) => ContentBlock::text(text.clone()),
            ContentKind::Image { data, mime_type } => {
                ContentBlock::image(data.clone(), mime_type.clone())
            }
            ContentKind::Audio { data, mime_type } => {
                ContentBlock::audio(data.clone(), mime_type.clone())
            }
            ContentKind::Structured(value) => ContentBlock::text(serde_json::to_string(value)?),
            ContentKind::ResourceLink { uri, resolved } => ContentBlock::resource_link(
                resolved
                    .clone()
                    .ok_or_else(|| ContentError::Unresolved(uri.clone()))?,
            ),
            ContentKind::EmbeddedResource { uri, resolved } => ContentBlock::resource(
                resolved
                    .clone()
                    .ok_or_else(|| ContentError::Unresolved(uri.clone()))?,
            ),
            ContentKind::Blob(_) => return Err(self.unsupported("tools")),
        };
        Ok(block.with_meta(self.meta.clone()))
    }

    /// Render as a prompt message carrying this content's role
    pub fn to_prompt(&self) -> Result<PromptMessage, ContentError> {
        let block = match &self.kind {
            ContentKind::Text(_)
            | ContentKind::Image { .. }
            | ContentKind::Audio { .. }
            | ContentKind::EmbeddedResource { .. } => self.to_tool()?,
            _ => return Err(self.unsupported("prompts")),
        };
        Ok(PromptMessage::new(self.role, block))
    }

    /// Render as the contents of a resource read
    pub fn to_resource(&self, target: &ResourceTarget) -> Result<ResourceContents, ContentError> {
        let contents = match &self.kind {
            ContentKind::Text(text) => ResourceContents::text(target.uri.clone(), text.clone())
                .with_mime_type(target.mime_type.clone()),
            ContentKind::Blob(data) => {
                ResourceContents::blob(target.uri.clone(), data.clone())
                    .with_mime_type(target.mime_type.clone())
            }
            ContentKind::Error(message) => return Err(ContentError::Failure(message.clone())),
            _ => return Err(self.unsupported("resources")),
        };
        Ok(contents.with_meta(self.meta.clone()))
    }

    /// The structured value, if this is structured content
    pub fn structured_value(&self) -> Option<&Value> {
        match &self.kind {
            ContentKind::Structured(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::text(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target() -> ResourceTarget {
        ResourceTarget::new("file://notes/today", Some("text/markdown".to_string()))
    }

    #[test]
    fn test_text_to_tool_without_meta() {
        let block = Content::text("hello").to_tool().unwrap();
        let value = serde_json::to_value(block).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hello"}));
    }

    #[test]
    fn test_text_to_tool_with_meta() {
        let block = Content::text("hello")
            .with_meta_entry("source", json!("cache"))
            .to_tool()
            .unwrap();
        let value = serde_json::to_value(block).unwrap();
        assert_eq!(value["_meta"], json!({"source": "cache"}));
    }

    #[test]
    fn test_blob_rejected_by_tools_and_prompts() {
        let blob = Content::blob(b"\x00\x01");
        let err = blob.to_tool().unwrap_err();
        assert_eq!(err.to_string(), "Blob content may not be used in tools");
        let err = blob.to_prompt().unwrap_err();
        assert_eq!(err.to_string(), "Blob content may not be used in prompts");
    }

    #[test]
    fn test_blob_to_resource_uses_target() {
        let contents = Content::blob(b"abc").to_resource(&target()).unwrap();
        let value = serde_json::to_value(contents).unwrap();
        assert_eq!(value["uri"], "file://notes/today");
        assert_eq!(value["blob"], "YWJj");
        assert_eq!(value["mimeType"], "text/markdown");
    }

    #[test]
    fn test_text_to_resource() {
        let contents = Content::text("# Notes").to_resource(&target()).unwrap();
        let value = serde_json::to_value(contents).unwrap();
        assert_eq!(value["text"], "# Notes");
        assert_eq!(value["mimeType"], "text/markdown");
    }

    #[test]
    fn test_image_and_audio_render_for_tools_not_resources() {
        let image = Content::image(b"png", "image/png");
        let value = serde_json::to_value(image.to_tool().unwrap()).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["mimeType"], "image/png");
        assert!(image.to_resource(&target()).is_err());

        let audio = Content::audio(b"wav", "audio/wav");
        assert_eq!(audio.to_prompt().unwrap().role, Role::User);
        assert_eq!(
            audio.to_resource(&target()).unwrap_err().to_string(),
            "Audio content may not be used in resources"
        );
    }

    #[test]
    fn test_structured_renders_json_text_for_tools_only() {
        let content = Content::structured(json!({"total": 3}));
        let value = serde_json::to_value(content.to_tool().unwrap()).unwrap();
        assert_eq!(value["text"], r#"{"total":3}"#);
        assert!(content.to_prompt().is_err());
        assert!(content.to_resource(&target()).is_err());
    }

    #[test]
    fn test_error_content() {
        let content = Content::error("disk full");
        assert!(content.is_error());
        let value = serde_json::to_value(content.to_tool().unwrap()).unwrap();
        assert_eq!(value["text"], "disk full");
        assert!(content.to_prompt().is_err());

        let err = content.to_resource(&target()).unwrap_err();
        assert!(matches!(err, ContentError::Failure(ref m) if m == "disk full"));
        let mcp: McpError = err.into();
        assert_eq!(mcp.to_error_object().code, -32603);
    }

    #[test]
    fn test_prompt_role() {
        let message = Content::text("Sure.").as_assistant().to_prompt().unwrap();
        assert_eq!(message.role, Role::Assistant);
        let message = Content::text("Hi").to_prompt().unwrap();
        assert_eq!(message.role, Role::User);
    }

    #[test]
    fn test_unresolved_link_and_embedded_fail() {
        let link = Content::resource_link("file://missing");
        assert!(!link.is_resolved());
        let err = link.to_tool().unwrap_err();
        assert_eq!(err.to_string(), "Resource [file://missing] not found.");
        assert!(link.to_prompt().is_err());

        let embedded = Content::embedded_resource("file://missing");
        assert!(matches!(
            embedded.to_tool().unwrap_err(),
            ContentError::Unresolved(_)
        ));
        assert!(embedded.to_resource(&target()).is_err());
    }
}
