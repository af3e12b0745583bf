//! # Switchboard Transport
//!
//! Moves JSON-RPC messages between clients and a [`JsonRpcService`]:
//!
//! - [`framing`]: newline-delimited message framing with a size cap
//! - [`stdio`]: a sequential loop over any reader/writer pair
//! - [`session`] and [`streamable`]: session minting, lookup and expiry
//! - [`server`]: the hyper endpoint that carries sessions over HTTP
//!
//! The transport knows nothing about MCP methods beyond `initialize`, which
//! is the one request allowed to open a session.
//!
//! [`JsonRpcService`]: switchboard_json_rpc::JsonRpcService

pub mod framing;
pub mod protocol;
pub mod server;
pub mod session;
pub mod stdio;
pub mod streamable;


pub use framing::{FramingError, MAX_MESSAGE_SIZE, ReadBuffer, serialize_message};
pub use protocol::{MCP_SESSION_ID_HEADER, extract_session_id};
pub use server::{HttpMcpServer, HttpMcpServerBuilder, ServerConfig};
pub use session::{SessionError, SessionHandle, SessionRegistry, SessionState};
pub use stdio::StdioTransport;
pub use streamable::{Rejection, SessionTransport, TransportReply};

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that stop a transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
