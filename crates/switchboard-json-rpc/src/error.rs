//! Error objects and error envelopes.
//!
//! An error envelope always carries an `id` member. It is the request id when
//! one could be read from the offending message and `null` otherwise; only the
//! former can be routed back to a caller over line framing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error_codes;
use crate::types::{JsonRpcVersion, RequestId};

/// The `error` member of an error envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// The input could not be decoded as a JSON-RPC message
    pub fn parse_error() -> Self {
        Self::new(error_codes::PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_REQUEST, reason)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_codes::METHOD_NOT_FOUND,
            format!("Method '{}' not found", method),
        )
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_PARAMS, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }

    /// Application code from the `-32099..=-32000` range
    pub fn server_error(code: i64, message: impl Into<String>) -> Self {
        debug_assert!(
            (error_codes::SERVER_ERROR_START..=error_codes::SERVER_ERROR_END).contains(&code),
            "server error code {} outside -32099..=-32000",
            code
        );
        Self::new(code, message)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// An error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub error: JsonRpcErrorObject,
}

impl JsonRpcError {
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            error,
        }
    }

    /// Undecodable input; `id` is whatever could be recovered from it
    pub fn parse_error(id: Option<RequestId>) -> Self {
        Self::new(id, JsonRpcErrorObject::parse_error())
    }

    /// A message refused before any request id could be trusted, such as a
    /// non-object body or a request naming no valid session
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(None, JsonRpcErrorObject::invalid_request(reason))
    }

    /// Whether the envelope names the request it answers
    pub fn is_answerable(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "[{}] {} ({})", id, self.error.message, self.error.code),
            None => write!(f, "{} ({})", self.error.message, self.error.code),
        }
    }
}

impl std::error::Error for JsonRpcError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recovered_id_is_echoed() {
        let error = JsonRpcError::parse_error(Some(RequestId::String("req-9".into())));
        assert!(error.is_answerable());
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": "req-9",
                "error": {"code": -32700, "message": "Parse error"}
            })
        );
    }

    #[test]
    fn test_rejection_has_null_id() {
        let error = JsonRpcError::invalid_request("Missing session id");
        assert!(!error.is_answerable());
        let value = serde_json::to_value(&error).unwrap();
        assert!(value.as_object().unwrap().contains_key("id"));
        assert!(value["id"].is_null());
        assert_eq!(value["error"]["code"], -32600);
        assert_eq!(value["error"]["message"], "Missing session id");
    }

    #[test]
    fn test_server_error_keeps_data() {
        let object = JsonRpcErrorObject::server_error(-32002, "Resource [x] not found.")
            .with_data(json!({"uri": "x"}));
        assert_eq!(object.code, -32002);
        assert_eq!(object.data, Some(json!({"uri": "x"})));
    }

    #[test]
    fn test_display_names_the_request() {
        let error = JsonRpcError::new(
            Some(RequestId::Number(4)),
            JsonRpcErrorObject::method_not_found("tools/run"),
        );
        assert_eq!(error.to_string(), "[4] Method 'tools/run' not found (-32601)");
    }
}
