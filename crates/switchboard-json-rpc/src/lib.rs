//! # JSON-RPC 2.0 Foundation
//!
//! Transport-agnostic JSON-RPC 2.0 types used by every Switchboard crate.
//! Nothing in here knows about MCP methods; it only models envelopes,
//! error codes and the classification of inbound messages.
//!
//! ## Features
//! - Request / notification / response envelopes with verbatim id echoing
//! - Standard error codes plus the server-error range, and error
//!   envelopes that echo whatever request id could be recovered
//! - Inbound message parsing that recovers the request id when possible
//! - `JsonRpcService` seam for transports (with the `async` feature)

pub mod dispatch;
pub mod error;
pub mod notification;
pub mod prelude;
pub mod request;
pub mod response;
pub mod types;

#[cfg(feature = "async")]
pub mod r#async;

pub use dispatch::{IncomingMessage, parse_json_rpc_message, parse_json_rpc_value};
pub use error::{JsonRpcError, JsonRpcErrorObject};
pub use notification::JsonRpcNotification;
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcMessage, JsonRpcResponse, ResponseResult};
pub use types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use r#async::{JsonRpcService, SessionContext};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
