//! MCP Resource Trait
//!
//! A resource is registered under a literal URI or a URI template. Reads
//! receive a context whose arguments are the variables matched from the
//! requested URI, and return exactly one [`Content`].

use async_trait::async_trait;

use switchboard_protocol::{
    Annotations, CompletionContext, McpResult, Meta, Resource, ResourceTemplate,
};

use crate::content::Content;
use crate::context::RequestContext;
use crate::uri_template::UriTemplate;

/// High-level trait for implementing MCP resources
#[async_trait]
pub trait McpResource: Send + Sync {
    /// Literal URI or URI template this resource answers
    fn uri(&self) -> &str;

    fn name(&self) -> &str;

    fn title(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }

    fn mime_type(&self) -> Option<&str> {
        Some("text/plain")
    }

    /// Size in bytes, if known up front
    fn size(&self) -> Option<u64> {
        None
    }

    fn annotations(&self) -> Option<Annotations> {
        None
    }

    fn meta(&self) -> Option<Meta> {
        None
    }

    /// Read the resource
    async fn read(&self, ctx: &RequestContext) -> McpResult<Content>;

    /// Suggestions for a template variable; none by default
    async fn complete(
        &self,
        _argument: &str,
        _value: &str,
        _context: &CompletionContext,
    ) -> McpResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn is_template(&self) -> bool {
        UriTemplate::is_template(self.uri())
    }

    /// Descriptor for `resources/list`
    fn to_resource(&self) -> Resource {
        let mut resource = Resource::new(self.uri(), self.name());
        resource.title = self.title().map(str::to_string);
        resource.description = self.description().map(str::to_string);
        resource.mime_type = self.mime_type().map(str::to_string);
        resource.size = self.size();
        resource.annotations = self.annotations();
        resource.meta = self.meta();
        resource
    }

    /// Descriptor for `resources/templates/list`
    fn to_resource_template(&self) -> ResourceTemplate {
        let mut template = ResourceTemplate::new(self.uri(), self.name());
        template.title = self.title().map(str::to_string);
        template.description = self.description().map(str::to_string);
        template.mime_type = self.mime_type().map(str::to_string);
        template.annotations = self.annotations();
        template.meta = self.meta();
        template
    }
}
