//! Request and notification handlers
//!
//! Each request handler serves exactly one method. The dispatcher asks every
//! registered handler in order whether it `supports` a message and hands it to
//! the first one that does.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::McpError;
use crate::mcp::message::{Notification, Reply, Request};

pub mod initialize;
pub mod notifications;
pub mod ping;
pub mod prompts;
pub mod resources;
pub mod tools;

pub use initialize::InitializeHandler;
pub use notifications::{CancelledHandler, InitializedHandler};
pub use ping::PingHandler;
pub use prompts::{PromptGetHandler, PromptListHandler};
pub use resources::{ResourceListHandler, ResourceReadHandler};
pub use tools::{ToolCallHandler, ToolListHandler};

#[async_trait]
pub trait RequestHandler: Send + Sync {
    fn supports(&self, request: &Request) -> bool;

    /// Produces the reply for a supported request. Handlers may answer with a
    /// protocol error themselves; an `Err` is classified by the dispatcher.
    async fn create_response(&self, request: &Request) -> Result<Reply, McpError>;
}

#[async_trait]
pub trait NotificationHandler: Send + Sync {
    fn supports(&self, notification: &Notification) -> bool;

    async fn handle(&self, notification: &Notification) -> Result<(), McpError>;
}

pub(crate) fn required_str<'a>(request: &'a Request, name: &str) -> Result<&'a str, McpError> {
    match request.param(name) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(McpError::invalid_argument(format!(
            "parameter \"{name}\" must be a string"
        ))),
        None => Err(McpError::invalid_argument(format!(
            "missing required parameter \"{name}\""
        ))),
    }
}

pub(crate) fn optional_str<'a>(
    request: &'a Request,
    name: &str,
) -> Result<Option<&'a str>, McpError> {
    match request.param(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(McpError::invalid_argument(format!(
            "parameter \"{name}\" must be a string"
        ))),
    }
}

pub(crate) fn optional_object(
    request: &Request,
    name: &str,
) -> Result<Option<Map<String, Value>>, McpError> {
    match request.param(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(value)) => Ok(Some(value.clone())),
        Some(_) => Err(McpError::invalid_argument(format!(
            "parameter \"{name}\" must be an object"
        ))),
    }
}

/// Optional positive `pageSize`, falling back to `default`.
pub(crate) fn requested_page_size(request: &Request, default: usize) -> Result<usize, McpError> {
    match request.param("pageSize") {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|size| usize::try_from(size).ok())
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                McpError::invalid_argument("parameter \"pageSize\" must be a positive integer")
            }),
    }
}

/// Unwraps a `json!` object literal into a result map.
pub(crate) fn result_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
