//! Newline-delimited JSON-RPC framing.
//!
//! Each message is one line of JSON terminated by `\n` (a trailing `\r` is
//! tolerated). [`ReadBuffer`] accumulates raw bytes and hands back complete
//! messages in arrival order, keeping any partial tail for the next append.

use bytes::{Bytes, BytesMut};
use thiserror::Error;

use switchboard_json_rpc::{IncomingMessage, JsonRpcError, JsonRpcMessage, parse_json_rpc_message};

/// Longest line accepted as a single message
pub const MAX_MESSAGE_SIZE: usize = 1_048_576;

/// Problems turning bytes into messages and back
#[derive(Debug, Error)]
pub enum FramingError {
    #[error("Message of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("Message is not valid UTF-8")]
    InvalidUtf8,

    /// A complete line that is not a usable JSON-RPC message; carries the
    /// request id when one could be recovered
    #[error("{0}")]
    Decode(JsonRpcError),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

impl FramingError {
    /// The error envelope to send back, if the sender can be answered
    pub fn reply(&self) -> Option<JsonRpcMessage> {
        match self {
            FramingError::Decode(err) if err.is_answerable() => Some(err.clone().into()),
            _ => None,
        }
    }
}

/// Incremental line decoder for one stream
#[derive(Debug)]
pub struct ReadBuffer {
    buffer: BytesMut,
    max_message_size: usize,
    /// Set after an oversized partial line; bytes are skipped up to the next newline
    discarding: bool,
}

impl Default for ReadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadBuffer {
    pub fn new() -> Self {
        Self::with_max_message_size(MAX_MESSAGE_SIZE)
    }

    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            max_message_size,
            discarding: false,
        }
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes held that do not yet form a complete line
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Take the next complete message.
    ///
    /// Returns `None` once only a partial line (or nothing) remains. Blank
    /// lines are skipped. Each error consumes the offending line, so callers
    /// can log it and keep reading.
    pub fn next_message(&mut self) -> Option<Result<IncomingMessage, FramingError>> {
        loop {
            let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') else {
                if self.discarding {
                    self.buffer.clear();
                } else if self.buffer.len() > self.max_message_size {
                    let size = self.buffer.len();
                    self.buffer.clear();
                    self.discarding = true;
                    return Some(Err(FramingError::TooLarge {
                        size,
                        max: self.max_message_size,
                    }));
                }
                return None;
            };

            let frame = self.buffer.split_to(newline + 1);
            if self.discarding {
                self.discarding = false;
                continue;
            }

            let mut line = &frame[..newline];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            if line.len() > self.max_message_size {
                return Some(Err(FramingError::TooLarge {
                    size: line.len(),
                    max: self.max_message_size,
                }));
            }
            let Ok(text) = std::str::from_utf8(line) else {
                return Some(Err(FramingError::InvalidUtf8));
            };
            if text.trim().is_empty() {
                continue;
            }

            return Some(parse_json_rpc_message(text).map_err(FramingError::Decode));
        }
    }
}

/// Encode a message as one line: its JSON followed by `\n`
pub fn serialize_message(message: &JsonRpcMessage) -> Result<Bytes, FramingError> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}
