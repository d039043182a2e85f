//! Typed JSON-RPC 2.0 messages and their wire encoding
//!
//! Requests and notifications are decoded by [`crate::mcp::factory::MessageFactory`];
//! responses and errors are encoded here.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Methods under this prefix are notifications and never get a reply.
pub const NOTIFICATION_PREFIX: &str = "notifications/";

pub type Params = Map<String, Value>;

/// Caller-supplied request id, echoed verbatim in the reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    /// Integer ids above `i64::MAX`.
    Unsigned(u64),
    String(String),
}

impl RequestId {
    /// Id used when none can be recovered from the input.
    pub const UNKNOWN: RequestId = RequestId::Number(0);

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(id) => Some(Self::String(id.clone())),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Number)
                .or_else(|| number.as_u64().map(Self::Unsigned)),
            _ => None,
        }
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<i32> for RequestId {
    fn from(id: i32) -> Self {
        Self::Number(i64::from(id))
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Unsigned(id) => write!(f, "{id}"),
            Self::String(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Application-specific code outside the reserved set.
    Other(i64),
}

impl ErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::Other(code) => *code,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            other => Self::Other(other),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::Other(_) => "Server error",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from_code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: RequestId,
    pub method: String,
    pub params: Option<Params>,
}

impl Request {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Params>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&RequestEnvelope {
            jsonrpc: JSONRPC_VERSION,
            id: Some(&self.id),
            method: &self.method,
            params: self.params.as_ref(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub method: String,
    pub params: Option<Params>,
}

impl Notification {
    pub fn new(method: impl Into<String>, params: Option<Params>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&RequestEnvelope {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            method: &self.method,
            params: self.params.as_ref(),
        })
    }
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Request(Request),
    Notification(Notification),
}

/// Successful reply. `result` is a map so an empty result always encodes as `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: RequestId,
    pub result: Map<String, Value>,
}

impl Response {
    pub fn new(id: RequestId, result: Map<String, Value>) -> Self {
        Self { id, result }
    }

    pub fn empty(id: RequestId) -> Self {
        Self::new(id, Map::new())
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ResponseEnvelope {
            jsonrpc: JSONRPC_VERSION,
            id: &self.id,
            result: &self.result,
        })
    }

    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let envelope: OwnedResponseEnvelope = serde_json::from_str(raw)?;
        Ok(Self::new(envelope.id, envelope.result))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub id: RequestId,
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(id: RequestId, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            id,
            code,
            message: message.into(),
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(RequestId::UNKNOWN, ErrorCode::ParseError, message)
    }

    pub fn invalid_request(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(id, ErrorCode::InvalidRequest, message)
    }

    pub fn method_not_found(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(id, ErrorCode::MethodNotFound, message)
    }

    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(id, ErrorCode::InvalidParams, message)
    }

    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(id, ErrorCode::InternalError, message)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ErrorEnvelope {
            jsonrpc: JSONRPC_VERSION,
            id: &self.id,
            error: ErrorBody {
                code: self.code,
                message: self.message.clone(),
            },
        })
    }

    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let envelope: OwnedErrorEnvelope = serde_json::from_str(raw)?;
        Ok(Self::new(
            envelope.id,
            envelope.error.code,
            envelope.error.message,
        ))
    }
}

/// What a request handler produces for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Response(Response),
    Error(ErrorResponse),
}

impl Reply {
    pub fn id(&self) -> &RequestId {
        match self {
            Self::Response(response) => &response.id,
            Self::Error(error) => &error.id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Response(response) => response.encode(),
            Self::Error(error) => error.encode(),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<ErrorResponse> for Reply {
    fn from(error: ErrorResponse) -> Self {
        Self::Error(error)
    }
}

#[derive(Serialize)]
struct RequestEnvelope<'a> {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a RequestId>,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'a Params>,
}

#[derive(Serialize)]
struct ResponseEnvelope<'a> {
    jsonrpc: &'static str,
    id: &'a RequestId,
    result: &'a Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct ErrorBody {
    code: ErrorCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    jsonrpc: &'static str,
    id: &'a RequestId,
    error: ErrorBody,
}

#[derive(Deserialize)]
struct OwnedResponseEnvelope {
    id: RequestId,
    result: Map<String, Value>,
}

#[derive(Deserialize)]
struct OwnedErrorEnvelope {
    id: RequestId,
    error: ErrorBody,
}
