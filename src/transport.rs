//! Newline-delimited JSON transport
//!
//! One message per line in, one reply per line out. Messages are processed
//! strictly in arrival order; the next line is not read until the current
//! message has been fully handled.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, trace, warn};

use crate::errors::TransportError;
use crate::mcp::message::{ErrorResponse, Reply};
use crate::mcp::rpc::encode_reply;
use crate::mcp::server::JsonRpcHandler;

/// Line transport, generic over reader and writer so tests can use buffers.
pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Next non-blank line as raw bytes, or `None` at end of input.
    ///
    /// Lines are not decoded here, so a line that is not valid UTF-8 does
    /// not end the stream.
    pub async fn read_line(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            let mut line = Vec::new();
            let bytes_read = self
                .reader
                .read_until(b'\n', &mut line)
                .await
                .map_err(TransportError::Read)?;

            if bytes_read == 0 {
                return Ok(None);
            }

            let trimmed = line.trim_ascii();
            if !trimmed.is_empty() {
                trace!(len = trimmed.len(), "read message");
                return Ok(Some(trimmed.to_vec()));
            }
        }
    }

    pub async fn write_line(&mut self, message: &str) -> Result<(), TransportError> {
        trace!(len = message.len(), "writing message");

        self.writer
            .write_all(message.as_bytes())
            .await
            .map_err(TransportError::Write)?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(TransportError::Write)?;
        self.writer.flush().await.map_err(TransportError::Write)?;

        Ok(())
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Serves messages until the input is closed.
pub async fn serve<R, W>(
    handler: &JsonRpcHandler,
    transport: &mut StdioTransport<R, W>,
) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("stdio transport ready");

    while let Some(line) = transport.read_line().await? {
        let reply = match String::from_utf8(line) {
            Ok(line) => handler.process(&line).await,
            Err(err) => {
                warn!(error = %err, "message is not valid utf-8");
                Some(encode_reply(&Reply::from(ErrorResponse::parse_error(
                    err.to_string(),
                ))))
            }
        };

        match reply {
            Some(reply) => transport.write_line(&reply).await?,
            None => debug!("no reply for message"),
        }
    }

    info!("stdio input closed");
    Ok(())
}

/// Serves the process's stdin and stdout.
pub async fn serve_stdio(handler: &JsonRpcHandler) -> Result<(), TransportError> {
    let mut transport = StdioTransport::new(tokio::io::stdin(), tokio::io::stdout());
    serve(handler, &mut transport).await
}
