//! Method router.
//!
//! Maps a method name to its handler, builds the request context, runs the
//! handler and folds the outcome into a JSON-RPC envelope carrying the
//! request id. Performs no I/O of its own.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error, warn};

use switchboard_json_rpc::{
    JsonRpcErrorObject, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcService,
    SessionContext,
};
use switchboard_protocol::McpError;

use crate::context::{RequestContext, ServerMetadata};
use crate::handlers::{McpHandler, standard_handlers};
use crate::registry::Registries;

/// Routes requests to method handlers
pub struct McpDispatcher {
    metadata: Arc<ServerMetadata>,
    registries: Arc<Registries>,
    handlers: HashMap<String, Arc<dyn McpHandler>>,
}

impl McpDispatcher {
    pub fn new(metadata: ServerMetadata, registries: Registries) -> Self {
        let mut handlers: HashMap<String, Arc<dyn McpHandler>> = HashMap::new();
        for handler in standard_handlers() {
            for method in handler.supported_methods() {
                handlers.insert(method, Arc::clone(&handler));
            }
        }
        Self {
            metadata: Arc::new(metadata),
            registries: Arc::new(registries),
            handlers,
        }
    }

    pub fn metadata(&self) -> &ServerMetadata {
        &self.metadata
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Methods with a handler, sorted
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Answer one request. Never fails: errors become envelopes with the request id.
    pub async fn dispatch(
        &self,
        request: JsonRpcRequest,
        session: Option<SessionContext>,
    ) -> JsonRpcMessage {
        let id = request.id.clone();
        let method = request.method.clone();

        let Some(handler) = self.handlers.get(&method) else {
            warn!(method = %method, "Method not found");
            return McpError::MethodNotFound(method)
                .to_json_rpc_response(Some(id))
                .into();
        };

        debug!(method = %method, id = %id, "Dispatching request");
        let ctx = RequestContext::new(
            Arc::clone(&self.metadata),
            Arc::clone(&self.registries),
            request,
            session,
        );

        match AssertUnwindSafe(handler.handle(&ctx)).catch_unwind().await {
            Ok(Ok(result)) => JsonRpcMessage::success(id, result),
            Ok(Err(err)) => {
                debug!(method = %method, error = %err, "Request failed");
                err.to_json_rpc_response(Some(id)).into()
            }
            Err(_) => {
                error!(method = %method, "Handler panicked");
                JsonRpcMessage::error(
                    Some(id),
                    JsonRpcErrorObject::internal_error(
                        "Something went wrong while processing the request.",
                    ),
                )
            }
        }
    }
}

#[async_trait]
impl JsonRpcService for McpDispatcher {
    async fn handle_request(
        &self,
        request: JsonRpcRequest,
        session: Option<SessionContext>,
    ) -> JsonRpcMessage {
        self.dispatch(request, session).await
    }

    async fn handle_notification(
        &self,
        notification: JsonRpcNotification,
        session: Option<SessionContext>,
    ) {
        debug!(
            method = %notification.method,
            session = ?session.map(|s| s.session_id),
            "Received notification"
        );
    }
}
