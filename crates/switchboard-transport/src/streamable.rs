//! Session-keyed request/response transport.
//!
//! Independent of HTTP: [`SessionTransport`] takes a decoded message plus the
//! session id the client presented, if any, and decides which session (if
//! any) it belongs to before handing it to the service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use switchboard_json_rpc::{IncomingMessage, JsonRpcError, JsonRpcMessage, JsonRpcService};

use crate::session::{SessionHandle, SessionRegistry};

/// Method that opens a session
pub const INITIALIZE_METHOD: &str = "initialize";

/// Why a message never reached the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No session id and not an initialize request
    MissingSession,
    /// A session id that is not (or no longer) registered
    UnknownSession(String),
}

/// Outcome of one inbound message
#[derive(Debug, Clone)]
pub enum TransportReply {
    /// The service answered; `session_id` names the session the reply belongs to
    Message {
        session_id: Option<String>,
        message: JsonRpcMessage,
    },
    /// Accepted without a reply (notifications)
    Accepted { session_id: Option<String> },
    /// Refused with an invalid-request envelope carrying no id
    Rejected {
        rejection: Rejection,
        message: JsonRpcMessage,
    },
}

impl TransportReply {
    fn rejected(rejection: Rejection) -> Self {
        let reason = match &rejection {
            Rejection::MissingSession => {
                "Missing session id; send initialize to open a session".to_string()
            }
            Rejection::UnknownSession(id) => format!("Unknown session [{}]", id),
        };
        TransportReply::Rejected {
            rejection,
            message: JsonRpcError::invalid_request(reason).into(),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            TransportReply::Message { session_id, .. } | TransportReply::Accepted { session_id } => {
                session_id.as_deref()
            }
            TransportReply::Rejected { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&JsonRpcMessage> {
        match self {
            TransportReply::Message { message, .. } | TransportReply::Rejected { message, .. } => {
                Some(message)
            }
            TransportReply::Accepted { .. } => None,
        }
    }
}

/// Routes messages to sessions and sessions to the service
#[derive(Clone)]
pub struct SessionTransport {
    service: Arc<dyn JsonRpcService>,
    sessions: SessionRegistry,
}

impl SessionTransport {
    pub fn new(service: Arc<dyn JsonRpcService>) -> Self {
        Self::with_registry(service, SessionRegistry::new())
    }

    pub fn with_registry(service: Arc<dyn JsonRpcService>, sessions: SessionRegistry) -> Self {
        Self { service, sessions }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Handle one decoded message presented with an optional session id
    pub async fn handle(&self, session_id: Option<&str>, message: IncomingMessage) -> TransportReply {
        match session_id {
            Some(id) => match self.sessions.get(id).await {
                Some(handle) => self.handle_in_session(&handle, message).await,
                None => {
                    warn!(session_id = %id, method = %message.method(), "Rejecting message for unknown session");
                    TransportReply::rejected(Rejection::UnknownSession(id.to_string()))
                }
            },
            None if is_initialize(&message) => self.open_session(message).await,
            None => {
                warn!(method = %message.method(), "Rejecting message without a session");
                TransportReply::rejected(Rejection::MissingSession)
            }
        }
    }

    /// Close a session; returns whether it existed
    pub async fn close(&self, session_id: &str) -> bool {
        let closed = self.sessions.remove(session_id).await.is_some();
        if closed {
            info!(session_id = %session_id, "Session closed by client");
        }
        closed
    }

    async fn open_session(&self, message: IncomingMessage) -> TransportReply {
        let handle = self.sessions.create().await;
        let session_id = handle.id().to_string();

        let reply = {
            let _turn = handle.acquire().await;
            self.service
                .handle_incoming(message, Some(handle.context()))
                .await
        };

        match reply {
            Some(message) if !message.is_error() => {
                if handle.activate().await.is_err() {
                    // Closed while initialize was running
                    return TransportReply::rejected(Rejection::UnknownSession(session_id));
                }
                info!(session_id = %session_id, "Session initialized");
                TransportReply::Message {
                    session_id: Some(session_id),
                    message,
                }
            }
            Some(message) => {
                debug!(session_id = %session_id, "Initialize failed, discarding session");
                self.sessions.remove(&session_id).await;
                TransportReply::Message {
                    session_id: None,
                    message,
                }
            }
            None => {
                self.sessions.remove(&session_id).await;
                TransportReply::Accepted { session_id: None }
            }
        }
    }

    async fn handle_in_session(
        &self,
        handle: &SessionHandle,
        message: IncomingMessage,
    ) -> TransportReply {
        let _turn = handle.acquire().await;
        if handle.touch().await.is_err() {
            return TransportReply::rejected(Rejection::UnknownSession(handle.id().to_string()));
        }

        let session_id = Some(handle.id().to_string());
        match self
            .service
            .handle_incoming(message, Some(handle.context()))
            .await
        {
            Some(message) => TransportReply::Message {
                session_id,
                message,
            },
            None => TransportReply::Accepted { session_id },
        }
    }
}

fn is_initialize(message: &IncomingMessage) -> bool {
    matches!(message, IncomingMessage::Request(request) if request.method == INITIALIZE_METHOD)
}
