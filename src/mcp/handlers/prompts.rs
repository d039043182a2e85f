use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use super::{
    optional_object, optional_str, requested_page_size, required_str, result_map, RequestHandler,
};
use crate::capability::prompt::{PromptArgument, PromptResult};
use crate::capability::{Identifier, PromptChain, PromptGet, PromptMetadata};
use crate::errors::McpError;
use crate::mcp::message::{ErrorResponse, Reply, Request, Response};
use crate::mcp::rpc::error_chain;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Serialize)]
struct PromptEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    arguments: Vec<PromptArgument>,
}

impl<'a> From<&'a dyn PromptMetadata> for PromptEntry<'a> {
    fn from(metadata: &'a dyn PromptMetadata) -> Self {
        Self {
            name: metadata.identifier(),
            description: metadata.description(),
            arguments: metadata.arguments(),
        }
    }
}

pub struct PromptListHandler {
    chain: Arc<PromptChain>,
    page_size: usize,
}

impl PromptListHandler {
    pub fn new(chain: Arc<PromptChain>, page_size: usize) -> Self {
        Self {
            chain,
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl RequestHandler for PromptListHandler {
    fn supports(&self, request: &Request) -> bool {
        request.method == "prompts/list"
    }

    async fn create_response(&self, request: &Request) -> Result<Reply, McpError> {
        let cursor = optional_str(request, "cursor")?;
        let page_size = requested_page_size(request, self.page_size)?;

        let mut prompts = Vec::new();
        for metadata in self.chain.metadata_page(page_size, cursor) {
            prompts.push(PromptEntry::from(metadata?));
        }

        let mut result = json!({ "prompts": prompts });
        if prompts.len() == page_size {
            if let Some(last) = prompts.last() {
                result["nextCursor"] = json!(last.name);
            }
        }

        Ok(Response::new(request.id.clone(), result_map(result)).into())
    }
}

pub struct PromptGetHandler {
    chain: Arc<PromptChain>,
}

impl PromptGetHandler {
    pub fn new(chain: Arc<PromptChain>) -> Self {
        Self { chain }
    }
}

fn render(result: PromptResult) -> Value {
    let messages = result
        .messages
        .into_iter()
        .map(|message| {
            json!({
                "role": message.role,
                "content": { "type": "text", "text": message.text }
            })
        })
        .collect::<Vec<_>>();

    let mut rendered = json!({ "messages": messages });
    if let Some(description) = result.description {
        rendered["description"] = Value::String(description);
    }
    rendered
}

#[async_trait]
impl RequestHandler for PromptGetHandler {
    fn supports(&self, request: &Request) -> bool {
        request.method == "prompts/get"
    }

    async fn create_response(&self, request: &Request) -> Result<Reply, McpError> {
        let arguments = optional_object(request, "arguments")?
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect::<BTreeMap<_, _>>();
        let input = PromptGet {
            name: required_str(request, "name")?.to_string(),
            arguments,
        };

        match self.chain.get(&input).await {
            Ok(result) => {
                Ok(Response::new(request.id.clone(), result_map(render(result))).into())
            }
            Err(err @ (McpError::NotFound { .. } | McpError::InvalidArgument(_))) => Err(err),
            Err(err) => {
                error!(
                    request_id = %request.id,
                    prompt = %input.name,
                    error = %error_chain(&err),
                    "prompt rendering failed"
                );
                Ok(ErrorResponse::internal_error(
                    request.id.clone(),
                    "Error while handling prompt",
                )
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mcp::message::ErrorCode;
    use crate::test_support::{FailingPrompt, StaticPrompt};

    fn chain() -> Arc<PromptChain> {
        Arc::new(
            PromptChain::new()
                .with(StaticPrompt::new("a"))
                .with(StaticPrompt::new("b"))
                .with(StaticPrompt::new("c"))
                .with(FailingPrompt::new("broken")),
        )
    }

    fn request(method: &str, params: Value) -> Request {
        Request::new(5, method, Some(result_map(params)))
    }

    async fn result_of(handler: &dyn RequestHandler, request: &Request) -> Value {
        match handler.create_response(request).await.expect("reply") {
            Reply::Response(response) => Value::Object(response.result),
            Reply::Error(error) => panic!("unexpected error reply: {error:?}"),
        }
    }

    #[tokio::test]
    async fn full_page_carries_next_cursor() {
        let handler = PromptListHandler::new(chain(), 2);

        let first = result_of(&handler, &request("prompts/list", json!({}))).await;
        assert_eq!(first["prompts"][0]["name"], "a");
        assert_eq!(first["prompts"][0]["arguments"][0]["name"], "topic");
        assert_eq!(first["nextCursor"], "b");

        let second = result_of(&handler, &request("prompts/list", json!({ "cursor": "b" }))).await;
        assert_eq!(second["prompts"], json!([{
            "name": "c",
            "description": "fixed prompt",
            "arguments": [{ "name": "topic", "description": "what to talk about", "required": false }]
        }]));
        assert!(second.get("nextCursor").is_none());
    }

    #[tokio::test]
    async fn request_page_size_overrides_default() {
        let handler = PromptListHandler::new(chain(), 2);
        let result = result_of(&handler, &request("prompts/list", json!({ "pageSize": 1 }))).await;

        assert_eq!(result["prompts"].as_array().map(Vec::len), Some(1));
        assert_eq!(result["nextCursor"], "a");

        let err = handler
            .create_response(&request("prompts/list", json!({ "pageSize": -1 })))
            .await
            .expect_err("invalid page size");
        assert!(matches!(err, McpError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn unknown_cursor_is_invalid_cursor_error() {
        let handler = PromptListHandler::new(chain(), 2);
        let err = handler
            .create_response(&request("prompts/list", json!({ "cursor": "zzz" })))
            .await
            .expect_err("invalid cursor");

        assert!(matches!(err, McpError::InvalidCursor(ref cursor) if cursor == "zzz"));
        assert!(err.to_string().contains("zzz"));
    }

    #[tokio::test]
    async fn renders_prompt_messages() {
        let handler = PromptGetHandler::new(chain());
        let result = result_of(
            &handler,
            &request("prompts/get", json!({ "name": "a", "arguments": { "topic": "rust" } })),
        )
        .await;

        assert_eq!(
            result,
            json!({
                "description": "fixed prompt",
                "messages": [{
                    "role": "user",
                    "content": { "type": "text", "text": "prompt a about rust" }
                }]
            })
        );
    }

    #[tokio::test]
    async fn non_string_arguments_are_stringified() {
        let handler = PromptGetHandler::new(chain());
        let result = result_of(
            &handler,
            &request("prompts/get", json!({ "name": "a", "arguments": { "topic": 42 } })),
        )
        .await;

        assert_eq!(result["messages"][0]["content"]["text"], "prompt a about 42");
    }

    #[tokio::test]
    async fn missing_prompt_propagates_not_found() {
        let handler = PromptGetHandler::new(chain());
        let err = handler
            .create_response(&request("prompts/get", json!({ "name": "nope" })))
            .await
            .expect_err("not found");

        assert!(matches!(err, McpError::NotFound { .. }));
    }

    #[tokio::test]
    async fn missing_required_argument_is_invalid_argument() {
        let handler = PromptGetHandler::new(Arc::new(
            PromptChain::new().with(StaticPrompt::requiring("review", "code")),
        ));
        let err = handler
            .create_response(&request(
                "prompts/get",
                json!({ "name": "review", "arguments": { "topic": "rust" } }),
            ))
            .await
            .expect_err("missing argument");

        assert!(matches!(err, McpError::InvalidArgument(ref message) if message.contains("\"code\"")));
    }

    #[tokio::test]
    async fn failing_prompt_is_internal_error() {
        let handler = PromptGetHandler::new(chain());
        let reply = handler
            .create_response(&request("prompts/get", json!({ "name": "broken" })))
            .await
            .expect("reply");

        let Reply::Error(error) = reply else {
            panic!("expected error reply");
        };
        assert_eq!(error.code, ErrorCode::InternalError);
        assert_eq!(error.message, "Error while handling prompt");
    }
}
