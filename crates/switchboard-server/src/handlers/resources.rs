use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use switchboard_protocol::{
    ListParams, ListResourceTemplatesResult, ListResourcesResult, McpError, McpResult,
    ReadResourceParams, Resource, ResourceTemplate,
};

use super::McpHandler;
use crate::context::RequestContext;
use crate::pagination::paginate;

/// `resources/list`: literal-URI resources only
pub struct ResourcesListHandler;

#[async_trait]
impl McpHandler for ResourcesListHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        let params: ListParams = ctx.params()?;
        let resources: Vec<Resource> = ctx
            .registries()
            .resources()?
            .iter()
            .map(|resource| resource.to_resource())
            .collect();

        let page = paginate(
            &resources,
            ctx.per_page(params.per_page),
            params.cursor.as_deref(),
        );

        ctx.response().system(&ListResourcesResult {
            resources: page.items,
            next_cursor: page.next_cursor,
        })
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["resources/list".to_string()]
    }
}

/// `resources/templates/list`
pub struct ResourceTemplatesHandler;

#[async_trait]
impl McpHandler for ResourceTemplatesHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        let params: ListParams = ctx.params()?;
        let templates: Vec<ResourceTemplate> = ctx
            .registries()
            .resource_templates()?
            .iter()
            .map(|resource| resource.to_resource_template())
            .collect();

        let page = paginate(
            &templates,
            ctx.per_page(params.per_page),
            params.cursor.as_deref(),
        );

        ctx.response().system(&ListResourceTemplatesResult {
            resource_templates: page.items,
            next_cursor: page.next_cursor,
        })
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["resources/templates/list".to_string()]
    }
}

/// `resources/read`: literal URIs win over templates
pub struct ResourcesReadHandler;

#[async_trait]
impl McpHandler for ResourcesReadHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        let params: ReadResourceParams = ctx.params()?;
        let resolved = ctx
            .registries()
            .resolve_resource(&params.uri)?
            .ok_or_else(|| McpError::ResourceNotFound(params.uri.clone()))?;

        let resource_ctx = ctx.for_resource(&resolved);
        debug!(uri = %params.uri, "Reading resource");

        let mut content = resolved.handler().read(&resource_ctx).await?;
        content.pre_process(&resource_ctx).await?;

        let result = resource_ctx
            .response()
            .resource(&content, &resolved.target())?;
        Ok(serde_json::to_value(result)?)
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["resources/read".to_string()]
    }
}
