use std::fmt;

use thiserror::Error;

use crate::capability::{prompt::PromptGet, resource::ResourceRead, tool::ToolCall};
use crate::mcp::message::RequestId;

/// Boxed cause returned by application-supplied capability items.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    Tool,
    Prompt,
    Resource,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tool => "tool",
            Self::Prompt => "prompt",
            Self::Resource => "resource",
        })
    }
}

/// Failures raised by capability chains and request handlers.
///
/// The dispatcher is the only place these are turned into wire errors.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{kind} \"{key}\" not found")]
    NotFound { kind: CapabilityKind, key: String },
    #[error("invalid cursor \"{0}\"")]
    InvalidCursor(String),
    #[error("tool \"{}\" failed", .call.name)]
    ToolExecution {
        call: ToolCall,
        #[source]
        source: BoxError,
    },
    #[error("prompt \"{}\" failed", .request.name)]
    PromptExecution {
        request: PromptGet,
        #[source]
        source: BoxError,
    },
    #[error("resource \"{}\" could not be read", .request.uri)]
    ResourceExecution {
        request: ResourceRead,
        #[source]
        source: BoxError,
    },
    /// Already handled; the peer must see no reply at all.
    #[error("message dropped: {0}")]
    Dropped(String),
}

impl McpError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(kind: CapabilityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            Self::ToolExecution { .. }
                | Self::PromptExecution { .. }
                | Self::ResourceExecution { .. }
        )
    }
}

/// Failures while decoding raw text into a message.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("{reason}")]
    InvalidRequest {
        id: Option<RequestId>,
        reason: String,
    },
    /// Malformed message in the `notifications/` namespace; never answered.
    #[error("notification \"{method}\": {reason}")]
    InvalidNotification { method: String, reason: String },
}

impl MessageError {
    pub fn invalid_request(id: Option<RequestId>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            id,
            reason: reason.into(),
        }
    }
}

/// I/O failures of the line transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read message")]
    Read(#[source] std::io::Error),
    #[error("failed to write message")]
    Write(#[source] std::io::Error),
}
