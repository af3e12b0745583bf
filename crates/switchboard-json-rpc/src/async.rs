use async_trait::async_trait;

use crate::{
    dispatch::IncomingMessage,
    notification::JsonRpcNotification,
    request::JsonRpcRequest,
    response::JsonRpcMessage,
};

/// Minimal session context handed to services by session-aware transports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Unique session identifier
    pub session_id: String,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// The seam between transports and whatever answers requests.
///
/// Implementations never fail: every request yields exactly one message,
/// success or error, carrying the request id.
#[async_trait]
pub trait JsonRpcService: Send + Sync {
    /// Answer a request
    async fn handle_request(
        &self,
        request: JsonRpcRequest,
        session: Option<SessionContext>,
    ) -> JsonRpcMessage;

    /// Observe a notification (default does nothing)
    async fn handle_notification(
        &self,
        notification: JsonRpcNotification,
        session: Option<SessionContext>,
    ) {
        let _ = (notification, session);
    }

    /// Route any inbound message; notifications produce no reply
    async fn handle_incoming(
        &self,
        message: IncomingMessage,
        session: Option<SessionContext>,
    ) -> Option<JsonRpcMessage> {
        match message {
            IncomingMessage::Request(request) => Some(self.handle_request(request, session).await),
            IncomingMessage::Notification(notification) => {
                self.handle_notification(notification, session).await;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestId;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct EchoService {
        notifications: AtomicUsize,
    }

    #[async_trait]
    impl JsonRpcService for EchoService {
        async fn handle_request(
            &self,
            request: JsonRpcRequest,
            session: Option<SessionContext>,
        ) -> JsonRpcMessage {
            let session_id = session.map(|s| s.session_id);
            JsonRpcMessage::success(
                request.id,
                json!({"method": request.method, "session": session_id}),
            )
        }

        async fn handle_notification(
            &self,
            _notification: JsonRpcNotification,
            _session: Option<SessionContext>,
        ) {
            self.notifications.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_request_gets_reply() {
        let service = EchoService::default();
        let request = JsonRpcRequest::new_no_params(RequestId::Number(1), "ping");
        let reply = service
            .handle_incoming(
                IncomingMessage::Request(request),
                Some(SessionContext::new("s-1")),
            )
            .await
            .unwrap();

        assert_eq!(reply.id(), Some(&RequestId::Number(1)));
        assert_eq!(reply.result().unwrap()["session"], "s-1");
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let service = EchoService::default();
        let notification = JsonRpcNotification::new_no_params("notifications/initialized");
        let reply = service
            .handle_incoming(IncomingMessage::Notification(notification), None)
            .await;

        assert!(reply.is_none());
        assert_eq!(service.notifications.load(Ordering::SeqCst), 1);
    }
}
