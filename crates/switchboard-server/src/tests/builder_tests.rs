use async_trait::async_trait;

use switchboard_protocol::{Annotations, McpResult};

use super::fixtures::{EchoTool, GreetingPrompt, ReadmeResource, UserResource};
use crate::builder::{McpServerBuilder, validate_annotations};
use crate::content::Content;
use crate::context::RequestContext;
use crate::resource::McpResource;
use crate::server::McpServer;
use crate::McpFrameworkError;

fn build_error(builder: McpServerBuilder) -> String {
    match builder.build() {
        Ok(_) => panic!("build unexpectedly succeeded"),
        Err(McpFrameworkError::Config(message)) => message,
        Err(other) => panic!("unexpected error: {}", other),
    }
}

struct BadTemplate;

#[async_trait]
impl McpResource for BadTemplate {
    fn uri(&self) -> &str {
        "file://{dir}/{unclosed"
    }

    fn name(&self) -> &str {
        "bad"
    }

    async fn read(&self, _ctx: &RequestContext) -> McpResult<Content> {
        Ok(Content::text(""))
    }
}

struct Loud;

#[async_trait]
impl McpResource for Loud {
    fn uri(&self) -> &str {
        "file://loud"
    }

    fn name(&self) -> &str {
        "loud"
    }

    fn annotations(&self) -> Option<Annotations> {
        Some(Annotations::new().with_priority(1.5))
    }

    async fn read(&self, _ctx: &RequestContext) -> McpResult<Content> {
        Ok(Content::text("LOUD"))
    }
}

#[test]
fn test_empty_name_rejected() {
    let message = build_error(McpServer::builder().name(""));
    assert!(message.contains("name"));
}

#[test]
fn test_default_page_size_above_max_rejected() {
    let message = build_error(McpServer::builder().default_page_size(60).max_page_size(50));
    assert!(message.contains("Default page size (60)"));
}

#[test]
fn test_zero_page_sizes_rejected() {
    build_error(McpServer::builder().max_page_size(0));
    build_error(McpServer::builder().default_page_size(0));
}

#[test]
fn test_duplicate_tool_rejected() {
    let message = build_error(McpServer::builder().tool(EchoTool).tool(EchoTool));
    assert!(message.contains("echo"));
}

#[test]
fn test_invalid_template_rejected() {
    let message = build_error(McpServer::builder().resource(BadTemplate));
    assert!(message.contains("file://{dir}/{unclosed"));
}

#[test]
fn test_priority_out_of_range_rejected() {
    let message = build_error(McpServer::builder().resource(Loud));
    assert!(message.contains("file://loud"));
    assert!(validate_annotations(&Annotations::new().with_priority(0.5)).is_ok());
    assert!(validate_annotations(&Annotations::new().with_priority(-0.1)).is_err());
}

#[test]
fn test_capabilities_follow_registrations() {
    let server = McpServer::builder().tool(EchoTool).build().expect("builds");
    let caps = &server.metadata().capabilities;
    assert!(caps.tools.is_some());
    assert!(caps.resources.is_none());
    assert!(caps.prompts.is_none());
    assert!(caps.completions.is_none());

    let server = McpServer::builder()
        .resource(ReadmeResource)
        .resource(UserResource)
        .prompt(GreetingPrompt)
        .with_completions()
        .list_changed(true)
        .build()
        .expect("builds");
    let caps = &server.metadata().capabilities;
    assert!(caps.tools.is_none());
    let resources = caps.resources.as_ref().unwrap();
    assert_eq!(resources.subscribe, Some(false));
    assert_eq!(resources.list_changed, Some(true));
    assert!(caps.prompts.is_some());
    assert!(caps.supports_completions());
}

#[test]
fn test_default_identity() {
    let server = McpServer::builder().build().expect("builds");
    let info = &server.metadata().implementation;
    assert_eq!(info.name, "switchboard-mcp-server");
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(server.metadata().default_page_size, 15);
    assert_eq!(server.metadata().max_page_size, 50);
}
