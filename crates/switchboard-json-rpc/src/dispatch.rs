use serde_json::Value;

use crate::{
    error::JsonRpcError, notification::JsonRpcNotification, request::JsonRpcRequest,
    types::RequestId,
};

/// Classification of a decoded inbound message.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// Carries an id and expects exactly one response
    Request(JsonRpcRequest),
    /// No id; never answered
    Notification(JsonRpcNotification),
}

impl IncomingMessage {
    pub fn method(&self) -> &str {
        match self {
            IncomingMessage::Request(req) => &req.method,
            IncomingMessage::Notification(notif) => &notif.method,
        }
    }

    pub fn id(&self) -> Option<&RequestId> {
        match self {
            IncomingMessage::Request(req) => Some(&req.id),
            IncomingMessage::Notification(_) => None,
        }
    }
}

/// Decode one JSON-RPC message from text.
///
/// On failure the returned error carries the request id whenever the input
/// was at least a JSON object with a usable `id` member. Callers that cannot
/// answer an id-less error (line framing) drop those.
pub fn parse_json_rpc_message(text: &str) -> Result<IncomingMessage, JsonRpcError> {
    let value: Value = serde_json::from_str(text).map_err(|_| JsonRpcError::parse_error(None))?;
    parse_json_rpc_value(value)
}

/// Decode one JSON-RPC message from an already-parsed JSON value.
pub fn parse_json_rpc_value(value: Value) -> Result<IncomingMessage, JsonRpcError> {
    let Some(object) = value.as_object() else {
        return Err(JsonRpcError::invalid_request("Message must be a JSON object"));
    };

    let id = object.get("id").and_then(RequestId::from_value);
    let has_id = object.get("id").is_some_and(|v| !v.is_null());

    if has_id {
        if id.is_none() {
            // Present but neither a string nor an integer
            return Err(JsonRpcError::invalid_request(
                "Request id must be a string or an integer",
            ));
        }
        serde_json::from_value::<JsonRpcRequest>(value)
            .map(IncomingMessage::Request)
            .map_err(|_| JsonRpcError::parse_error(id))
    } else {
        serde_json::from_value::<JsonRpcNotification>(value)
            .map(IncomingMessage::Notification)
            .map_err(|_| JsonRpcError::parse_error(None))
    }
}
