use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::NotificationHandler;
use crate::errors::McpError;
use crate::mcp::message::Notification;

/// Acknowledges the end of the client handshake.
pub struct InitializedHandler;

#[async_trait]
impl NotificationHandler for InitializedHandler {
    fn supports(&self, notification: &Notification) -> bool {
        notification.method == "notifications/initialized"
    }

    async fn handle(&self, _notification: &Notification) -> Result<(), McpError> {
        info!("client initialized");
        Ok(())
    }
}

/// Records cancellation requests. Running executions are not interrupted.
pub struct CancelledHandler;

#[async_trait]
impl NotificationHandler for CancelledHandler {
    fn supports(&self, notification: &Notification) -> bool {
        notification.method == "notifications/cancelled"
    }

    async fn handle(&self, notification: &Notification) -> Result<(), McpError> {
        let request_id = notification
            .param("requestId")
            .map(Value::to_string)
            .unwrap_or_default();
        let reason = notification
            .param("reason")
            .and_then(Value::as_str)
            .unwrap_or("");

        debug!(request_id = %request_id, reason, "client cancelled request");
        Ok(())
    }
}
