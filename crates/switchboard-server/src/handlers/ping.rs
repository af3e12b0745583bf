use async_trait::async_trait;
use serde_json::Value;

use switchboard_protocol::{EmptyResult, McpResult};

use super::McpHandler;
use crate::context::RequestContext;

/// Ping handler for ping endpoint
pub struct PingHandler;

#[async_trait]
impl McpHandler for PingHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        ctx.response().system(&EmptyResult::new())
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["ping".to_string()]
    }
}
