//! Content blocks and resource contents.
//!
//! Both shapes split into a common envelope (`annotations`, `_meta`, or the
//! resource `uri`) and a body that differs by kind. The body is flattened
//! into the envelope on the wire.

use serde::{Deserialize, Serialize};

use crate::meta::{Annotations, Meta};

/// One `contents[]` entry of `resources/read`, also embedded in
/// `resource` blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(flatten)]
    pub body: ResourceBody,
}

/// `text` or base64 `blob`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceBody {
    Text { text: String },
    Blob { blob: String },
}

impl ResourceContents {
    fn new(uri: impl Into<String>, body: ResourceBody) -> Self {
        Self {
            uri: uri.into(),
            mime_type: None,
            meta: None,
            body,
        }
    }

    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(uri, ResourceBody::Text { text: text.into() })
    }

    /// `blob` must already be base64
    pub fn blob(uri: impl Into<String>, blob: impl Into<String>) -> Self {
        Self::new(uri, ResourceBody::Blob { blob: blob.into() })
    }

    pub fn with_mime_type(mut self, mime_type: Option<String>) -> Self {
        self.mime_type = mime_type;
        self
    }

    pub fn with_meta(mut self, meta: Option<Meta>) -> Self {
        self.meta = meta;
        self
    }
}

/// Descriptor carried by a `resource_link` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// One entry of a tool result's `content` or a prompt message's `content`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(flatten)]
    pub body: BlockBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// The kind-specific part of a block, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBody {
    Text {
        text: String,
    },
    Image {
        /// Base64
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Audio {
        /// Base64
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    ResourceLink(ResourceReference),
    Resource {
        resource: ResourceContents,
    },
}

impl From<BlockBody> for ContentBlock {
    fn from(body: BlockBody) -> Self {
        Self {
            body,
            annotations: None,
            meta: None,
        }
    }
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        BlockBody::Text { text: text.into() }.into()
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        BlockBody::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
        .into()
    }

    pub fn audio(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        BlockBody::Audio {
            data: data.into(),
            mime_type: mime_type.into(),
        }
        .into()
    }

    pub fn resource_link(resource: ResourceReference) -> Self {
        BlockBody::ResourceLink(resource).into()
    }

    pub fn resource(resource: ResourceContents) -> Self {
        BlockBody::Resource { resource }.into()
    }

    pub fn with_meta(mut self, meta: Option<Meta>) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = Some(annotations);
        self
    }
}
