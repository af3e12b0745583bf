//! MCP Server
//!
//! A built server is a [`McpDispatcher`] behind an `Arc`, ready to be handed
//! to any transport that speaks [`JsonRpcService`].

use std::sync::Arc;

use tracing::debug;

use switchboard_json_rpc::{
    IncomingMessage, JsonRpcMessage, JsonRpcRequest, JsonRpcService, SessionContext,
    parse_json_rpc_message,
};

use crate::builder::McpServerBuilder;
use crate::context::ServerMetadata;
use crate::dispatch::McpDispatcher;

/// A configured MCP server
#[derive(Clone)]
pub struct McpServer {
    dispatcher: Arc<McpDispatcher>,
}

impl McpServer {
    pub fn builder() -> McpServerBuilder {
        McpServerBuilder::new()
    }

    pub(crate) fn new(dispatcher: McpDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn metadata(&self) -> &ServerMetadata {
        self.dispatcher.metadata()
    }

    pub fn dispatcher(&self) -> Arc<McpDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// The router as a transport-facing service
    pub fn service(&self) -> Arc<dyn JsonRpcService> {
        self.dispatcher.clone()
    }

    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        session: Option<SessionContext>,
    ) -> JsonRpcMessage {
        self.dispatcher.dispatch(request, session).await
    }

    /// Decode and answer one raw message.
    ///
    /// Notifications yield `None`, as do undecodable messages without a
    /// recoverable id.
    pub async fn handle_message(
        &self,
        text: &str,
        session: Option<SessionContext>,
    ) -> Option<JsonRpcMessage> {
        match parse_json_rpc_message(text) {
            Ok(IncomingMessage::Request(request)) => {
                Some(self.dispatcher.dispatch(request, session).await)
            }
            Ok(message @ IncomingMessage::Notification(_)) => {
                self.dispatcher.handle_incoming(message, session).await
            }
            Err(err) if err.id.is_some() => Some(err.into()),
            Err(err) => {
                debug!(error = %err.error.message, "Dropping undecodable message without id");
                None
            }
        }
    }
}
