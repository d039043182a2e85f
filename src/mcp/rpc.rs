//! Translation of internal failures into JSON-RPC error replies
//!
//! This is the single place where [`McpError`] and [`MessageError`] values
//! become wire errors. Execution causes are logged, never serialized.

use std::error::Error;

use tracing::warn;

use crate::errors::{McpError, MessageError};
use crate::mcp::message::{ErrorResponse, Reply, RequestId};

/// Emitted when even the error reply cannot be encoded.
const ENCODE_FAILURE: &str =
    r#"{"jsonrpc":"2.0","id":0,"error":{"code":-32603,"message":"Internal error"}}"#;

/// Renders an error and its `source()` chain as `outer: inner: root`.
pub fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// Maps a handler failure to its reply. `None` means the peer gets nothing.
pub fn mcp_error_to_reply(id: RequestId, err: &McpError) -> Option<ErrorResponse> {
    match err {
        McpError::NotFound { .. } => Some(ErrorResponse::method_not_found(id, err.to_string())),
        McpError::InvalidArgument(_) | McpError::InvalidCursor(_) => {
            Some(ErrorResponse::invalid_params(id, err.to_string()))
        }
        McpError::ToolExecution { .. } => Some(ErrorResponse::internal_error(
            id,
            "Error while executing tool",
        )),
        McpError::PromptExecution { .. } => Some(ErrorResponse::internal_error(
            id,
            "Error while handling prompt",
        )),
        McpError::ResourceExecution { .. } => Some(ErrorResponse::internal_error(
            id,
            "Error while reading resource",
        )),
        McpError::Dropped(_) => None,
    }
}

/// Maps a decode failure to its reply. Malformed notifications get none.
pub fn message_error_to_reply(err: &MessageError) -> Option<ErrorResponse> {
    match err {
        MessageError::Parse(parse) => Some(ErrorResponse::parse_error(parse.to_string())),
        MessageError::InvalidRequest { id, reason } => Some(ErrorResponse::invalid_request(
            id.clone().unwrap_or(RequestId::UNKNOWN),
            reason.clone(),
        )),
        MessageError::InvalidNotification { .. } => None,
    }
}

/// Encodes a reply, falling back to a fixed internal error document.
pub fn encode_reply(reply: &Reply) -> String {
    reply.encode().unwrap_or_else(|err| {
        warn!(request_id = %reply.id(), error = %err, "failed to encode reply");
        ENCODE_FAILURE.to_string()
    })
}
