//! Stdio transport: one newline-delimited message per line in, one reply
//! per request out.
//!
//! Messages are handled strictly in arrival order, so replies leave in the
//! order their requests came in. Notifications are never answered.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use switchboard_json_rpc::{JsonRpcMessage, JsonRpcService};

use crate::Result;
use crate::framing::{MAX_MESSAGE_SIZE, ReadBuffer, serialize_message};

const READ_CHUNK: usize = 8 * 1024;

/// Runs a [`JsonRpcService`] over a byte stream
#[derive(Clone)]
pub struct StdioTransport {
    service: Arc<dyn JsonRpcService>,
    max_message_size: usize,
}

impl StdioTransport {
    pub fn new(service: Arc<dyn JsonRpcService>) -> Self {
        Self {
            service,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    /// Cap on a single line; longer lines are dropped with a warning
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Serve the process's stdin and stdout until stdin closes
    pub async fn run_stdio(&self) -> Result<()> {
        self.run(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve `reader` and `writer` until the reader reaches end of stream
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Stdio transport started");
        let mut buffer = ReadBuffer::with_max_message_size(self.max_message_size);
        let mut chunk = vec![0u8; READ_CHUNK];

        loop {
            let read = reader.read(&mut chunk).await?;
            if read == 0 {
                break;
            }
            buffer.append(&chunk[..read]);

            while let Some(next) = buffer.next_message() {
                let reply = match next {
                    Ok(message) => {
                        debug!(method = %message.method(), "Received message");
                        self.service.handle_incoming(message, None).await
                    }
                    Err(err) => {
                        warn!("Dropping unreadable message: {}", err);
                        err.reply()
                    }
                };

                if let Some(reply) = reply {
                    write_message(&mut writer, &reply).await?;
                }
            }
        }

        if !buffer.is_empty() {
            warn!(
                bytes = buffer.len(),
                "Input closed mid-message; discarding partial line"
            );
        }
        info!("Stdio transport stopped");
        Ok(())
    }
}

async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &JsonRpcMessage,
) -> Result<()> {
    let line = serialize_message(message)?;
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}
