//! Decoding of raw text into requests and notifications

use serde_json::{Map, Value};

use crate::errors::MessageError;
use crate::mcp::message::{Message, Notification, Request, RequestId, NOTIFICATION_PREFIX};

/// Decoded top-level JSON: a single message object or a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Single(Value),
    Batch(Vec<Value>),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFactory;

impl MessageFactory {
    pub fn new() -> Self {
        Self
    }

    /// Decodes one message. Batches are rejected as an invalid request.
    pub fn create(&self, raw: &str) -> Result<Message, MessageError> {
        match self.parse(raw)? {
            Payload::Single(value) => self.from_value(value),
            Payload::Batch(_) => Err(MessageError::invalid_request(
                None,
                "expected a single message, got a batch",
            )),
        }
    }

    pub fn parse(&self, raw: &str) -> Result<Payload, MessageError> {
        Ok(match serde_json::from_str(raw)? {
            Value::Array(items) => Payload::Batch(items),
            value => Payload::Single(value),
        })
    }

    pub fn from_value(&self, value: Value) -> Result<Message, MessageError> {
        let Value::Object(mut object) = value else {
            return Err(MessageError::invalid_request(
                None,
                "message must be a JSON object",
            ));
        };

        let raw_id = object.remove("id");
        let id = raw_id.as_ref().and_then(RequestId::from_value);

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            Some(_) => {
                return Err(MessageError::invalid_request(id, "method must be a string"))
            }
            None => return Err(MessageError::invalid_request(id, "missing \"method\"")),
        };

        let is_notification = method.starts_with(NOTIFICATION_PREFIX);
        let params = match take_params(&mut object) {
            Ok(params) => params,
            Err(reason) if is_notification => {
                return Err(MessageError::InvalidNotification {
                    method,
                    reason: reason.to_string(),
                })
            }
            Err(reason) => return Err(MessageError::invalid_request(id, reason)),
        };

        if is_notification {
            return Ok(Message::Notification(Notification { method, params }));
        }

        match id {
            Some(id) => Ok(Message::Request(Request { id, method, params })),
            None if raw_id.is_some() => Err(MessageError::invalid_request(
                None,
                "id must be a string or an integer",
            )),
            None => Err(MessageError::invalid_request(None, "missing \"id\"")),
        }
    }
}

fn take_params(object: &mut Map<String, Value>) -> Result<Option<Map<String, Value>>, &'static str> {
    match object.remove("params") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(params)) => Ok(Some(params)),
        Some(_) => Err("params must be an object"),
    }
}
