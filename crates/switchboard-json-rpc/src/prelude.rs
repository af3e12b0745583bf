//! Common re-exports.
//!
//! ```rust
//! use switchboard_json_rpc::prelude::*;
//! ```

pub use crate::dispatch::{IncomingMessage, parse_json_rpc_message};
pub use crate::error::{JsonRpcError, JsonRpcErrorObject};
pub use crate::notification::JsonRpcNotification;
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcMessage, JsonRpcResponse, ResponseResult};
pub use crate::types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use crate::r#async::{JsonRpcService, SessionContext};

pub use crate::error_codes::*;
