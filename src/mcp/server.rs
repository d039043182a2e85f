//! The JSON-RPC dispatcher
//!
//! Turns one inbound text message (or batch) into at most one outbound text
//! message: decode, route to the first handler that supports the message,
//! classify failures, encode. The dispatcher keeps no state between calls.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::capability::{PromptChain, ResourceChain, ToolChain};
use crate::errors::MessageError;
use crate::mcp::factory::{MessageFactory, Payload};
use crate::mcp::handlers::{
    CancelledHandler, InitializeHandler, InitializedHandler, NotificationHandler, PingHandler,
    PromptGetHandler, PromptListHandler, RequestHandler, ResourceListHandler, ResourceReadHandler,
    ToolCallHandler, ToolListHandler,
};
use crate::mcp::message::{ErrorResponse, Message, Notification, Reply, Request};
use crate::mcp::rpc::{encode_reply, error_chain, mcp_error_to_reply, message_error_to_reply};

/// Name and version reported in the `initialize` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

pub struct JsonRpcHandler {
    factory: MessageFactory,
    request_handlers: Vec<Box<dyn RequestHandler>>,
    notification_handlers: Vec<Box<dyn NotificationHandler>>,
}

impl JsonRpcHandler {
    /// Handlers are consulted in registration order; the first match wins.
    pub fn new(
        request_handlers: Vec<Box<dyn RequestHandler>>,
        notification_handlers: Vec<Box<dyn NotificationHandler>>,
    ) -> Self {
        Self {
            factory: MessageFactory::new(),
            request_handlers,
            notification_handlers,
        }
    }

    /// Dispatcher serving the standard MCP method set over the given chains.
    pub fn standard(
        server_info: ServerInfo,
        tools: Arc<ToolChain>,
        prompts: Arc<PromptChain>,
        resources: Arc<ResourceChain>,
        page_size: usize,
    ) -> Self {
        Self::new(
            vec![
                Box::new(InitializeHandler::new(server_info)),
                Box::new(PingHandler),
                Box::new(ToolListHandler::new(Arc::clone(&tools))),
                Box::new(ToolCallHandler::new(tools)),
                Box::new(PromptListHandler::new(Arc::clone(&prompts), page_size)),
                Box::new(PromptGetHandler::new(prompts)),
                Box::new(ResourceListHandler::new(Arc::clone(&resources), page_size)),
                Box::new(ResourceReadHandler::new(resources)),
            ],
            vec![Box::new(InitializedHandler), Box::new(CancelledHandler)],
        )
    }

    /// Processes one raw message. Returns the encoded reply, or `None` when
    /// the peer must not receive anything.
    pub async fn process(&self, raw: &str) -> Option<String> {
        let payload = match self.factory.parse(raw) {
            Ok(payload) => payload,
            Err(err) => return self.reject(&err).map(|reply| encode_reply(&reply)),
        };

        match payload {
            Payload::Single(value) => self
                .process_value(value)
                .await
                .map(|reply| encode_reply(&reply)),
            Payload::Batch(items) if items.is_empty() => self
                .reject(&MessageError::invalid_request(None, "empty batch"))
                .map(|reply| encode_reply(&reply)),
            Payload::Batch(items) => {
                let mut encoded = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(reply) = self.process_value(item).await {
                        encoded.push(encode_reply(&reply));
                    }
                }

                if encoded.is_empty() {
                    None
                } else {
                    Some(format!("[{}]", encoded.join(",")))
                }
            }
        }
    }

    async fn process_value(&self, value: Value) -> Option<Reply> {
        match self.factory.from_value(value) {
            Ok(Message::Request(request)) => self.handle_request(&request).await,
            Ok(Message::Notification(notification)) => {
                self.handle_notification(&notification).await;
                None
            }
            Err(err) => self.reject(&err),
        }
    }

    fn reject(&self, err: &MessageError) -> Option<Reply> {
        warn!(error = %err, "rejected inbound message");
        message_error_to_reply(err).map(Reply::from)
    }

    /// Routes a decoded request and classifies any failure.
    pub async fn handle_request(&self, request: &Request) -> Option<Reply> {
        let audit_params = redact_audit_params(request.params.as_ref());

        let reply = match self
            .request_handlers
            .iter()
            .find(|handler| handler.supports(request))
        {
            None => Some(
                ErrorResponse::method_not_found(
                    request.id.clone(),
                    format!("Method not found: {}", request.method),
                )
                .into(),
            ),
            Some(handler) => match handler.create_response(request).await {
                Ok(reply) => Some(reply),
                Err(err) => {
                    debug!(
                        request_id = %request.id,
                        method = %request.method,
                        error = %error_chain(&err),
                        "request handler failed"
                    );
                    mcp_error_to_reply(request.id.clone(), &err).map(Reply::from)
                }
            },
        };

        info!(
            method = %request.method,
            params = %audit_params,
            outcome = match &reply {
                Some(reply) if reply.is_error() => "failure",
                Some(_) => "success",
                None => "dropped",
            },
            "mcp action audited"
        );

        reply
    }

    /// Runs the first supporting notification handler. Never produces output.
    pub async fn handle_notification(&self, notification: &Notification) {
        let Some(handler) = self
            .notification_handlers
            .iter()
            .find(|handler| handler.supports(notification))
        else {
            debug!(method = %notification.method, "no handler for notification");
            return;
        };

        if let Err(err) = handler.handle(notification).await {
            warn!(
                method = %notification.method,
                error = %error_chain(&err),
                "notification handler failed"
            );
        }
    }
}

pub fn redact_audit_params(params: Option<&serde_json::Map<String, Value>>) -> Value {
    params
        .map(|params| redact_audit_value(&Value::Object(params.clone())))
        .unwrap_or(Value::Null)
}

pub fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "bearer" | "api_key" | "apikey"
    ) || normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("credential")
}
