use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{JsonRpcVersion, RequestId};

/// Parameters for a JSON-RPC request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(Map<String, Value>),
}

impl RequestParams {
    /// Get a named parameter (object params only)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            RequestParams::Array(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RequestParams::Object(map) => map.is_empty(),
            RequestParams::Array(vec) => vec.is_empty(),
        }
    }

    /// Convert to a serde_json::Value for typed deserialization
    pub fn to_value(&self) -> Value {
        match self {
            RequestParams::Object(map) => Value::Object(map.clone()),
            RequestParams::Array(arr) => Value::Array(arr.clone()),
        }
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        RequestParams::Object(map)
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(vec: Vec<Value>) -> Self {
        RequestParams::Array(vec)
    }
}

/// A JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
}

impl JsonRpcRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            method: method.into(),
            params,
        }
    }

    /// Create a new request with no parameters
    pub fn new_no_params(id: RequestId, method: impl Into<String>) -> Self {
        Self::new(id, method, None)
    }

    /// Create a request from a JSON object; non-object values yield no params.
    pub fn with_value_params(id: RequestId, method: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => Some(RequestParams::Object(map)),
            Value::Array(vec) => Some(RequestParams::Array(vec)),
            _ => None,
        };
        Self::new(id, method, params)
    }

    /// Get a parameter by name (if params are an object)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Params as a JSON value; absent params become an empty object.
    pub fn params_value(&self) -> Value {
        self.params
            .as_ref()
            .map(RequestParams::to_value)
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn test_request_serialization() {
        let request = JsonRpcRequest::new_no_params(RequestId::Number(1), "test_method");

        let json = to_string(&request).unwrap();
        let parsed: JsonRpcRequest = from_str(&json).unwrap();

        assert_eq!(parsed.id, RequestId::Number(1));
        assert_eq!(parsed.method, "test_method");
        assert!(parsed.params.is_none());
        assert!(!json.contains("params"));
    }

    #[test]
    fn test_request_with_object_params() {
        let request = JsonRpcRequest::with_value_params(
            RequestId::String("req1".to_string()),
            "tools/call",
            json!({"name": "echo", "arguments": {"text": "hi"}}),
        );

        assert_eq!(request.get_param("name"), Some(&json!("echo")));
        assert_eq!(request.get_param("missing"), None);
        assert_eq!(request.params_value()["arguments"]["text"], "hi");
    }

    #[test]
    fn test_missing_params_value_is_empty_object() {
        let request = JsonRpcRequest::new_no_params(RequestId::Number(2), "ping");
        assert_eq!(request.params_value(), json!({}));
    }
}
