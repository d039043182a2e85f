use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::error;
use uuid::Uuid;

use super::{optional_object, required_str, result_map, RequestHandler};
use crate::capability::{Identifier, ToolCall, ToolChain};
use crate::errors::McpError;
use crate::mcp::message::{ErrorResponse, Reply, Request, Response};
use crate::mcp::rpc::error_chain;

pub const FALLBACK_SCHEMA_URI: &str = "http://json-schema.org/draft-07/schema#";

/// Schema listed for tools that declare none.
pub fn fallback_input_schema() -> Value {
    json!({
        "type": "object",
        "$schema": FALLBACK_SCHEMA_URI
    })
}

fn listed_schema(schema: Value) -> Value {
    match schema {
        Value::Null => fallback_input_schema(),
        Value::Object(map) if map.is_empty() => fallback_input_schema(),
        schema => schema,
    }
}

pub struct ToolListHandler {
    chain: Arc<ToolChain>,
}

impl ToolListHandler {
    pub fn new(chain: Arc<ToolChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl RequestHandler for ToolListHandler {
    fn supports(&self, request: &Request) -> bool {
        request.method == "tools/list"
    }

    async fn create_response(&self, request: &Request) -> Result<Reply, McpError> {
        let tools = self
            .chain
            .metadata()
            .into_iter()
            .map(|metadata| {
                json!({
                    "name": metadata.identifier(),
                    "description": metadata.description(),
                    "inputSchema": listed_schema(metadata.input_schema()),
                })
            })
            .collect::<Vec<_>>();

        Ok(Response::new(request.id.clone(), result_map(json!({ "tools": tools }))).into())
    }
}

pub struct ToolCallHandler {
    chain: Arc<ToolChain>,
}

impl ToolCallHandler {
    pub fn new(chain: Arc<ToolChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl RequestHandler for ToolCallHandler {
    fn supports(&self, request: &Request) -> bool {
        request.method == "tools/call"
    }

    async fn create_response(&self, request: &Request) -> Result<Reply, McpError> {
        let call = ToolCall {
            correlation_id: Uuid::new_v4().to_string(),
            name: required_str(request, "name")?.to_string(),
            arguments: optional_object(request, "arguments")?.unwrap_or_else(Map::new),
        };

        // Unknown tools land here too and are reported as internal errors.
        let output = match self.chain.call(&call).await {
            Ok(output) => output,
            Err(err) => {
                error!(
                    request_id = %request.id,
                    correlation_id = %call.correlation_id,
                    tool = %call.name,
                    error = %error_chain(&err),
                    "tool execution failed"
                );
                return Ok(ErrorResponse::internal_error(
                    request.id.clone(),
                    "Error while executing tool",
                )
                .into());
            }
        };

        let mut result = json!({
            "content": [{ "type": "text", "text": output.text }]
        });
        if output.is_error {
            result["isError"] = Value::Bool(true);
        }

        Ok(Response::new(request.id.clone(), result_map(result)).into())
    }
}
