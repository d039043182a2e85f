use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::{optional_str, requested_page_size, required_str, result_map, RequestHandler};
use crate::capability::{Identifier, ResourceChain, ResourceMetadata, ResourceRead};
use crate::errors::McpError;
use crate::mcp::message::{ErrorResponse, Reply, Request, Response};
use crate::mcp::rpc::error_chain;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceEntry<'a> {
    uri: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

impl<'a> From<&'a dyn ResourceMetadata> for ResourceEntry<'a> {
    fn from(metadata: &'a dyn ResourceMetadata) -> Self {
        Self {
            uri: metadata.identifier(),
            name: metadata.name(),
            description: metadata.description(),
            mime_type: metadata.mime_type(),
            size: metadata.size(),
        }
    }
}

pub struct ResourceListHandler {
    chain: Arc<ResourceChain>,
    page_size: usize,
}

impl ResourceListHandler {
    pub fn new(chain: Arc<ResourceChain>, page_size: usize) -> Self {
        Self {
            chain,
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl RequestHandler for ResourceListHandler {
    fn supports(&self, request: &Request) -> bool {
        request.method == "resources/list"
    }

    async fn create_response(&self, request: &Request) -> Result<Reply, McpError> {
        let cursor = optional_str(request, "cursor")?;
        let page_size = requested_page_size(request, self.page_size)?;

        let resources = self
            .chain
            .metadata_page(page_size, cursor)
            .map(|metadata| metadata.map(ResourceEntry::from))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = json!({ "resources": resources });
        if resources.len() == page_size {
            if let Some(last) = resources.last() {
                result["nextCursor"] = json!(last.name);
            }
        }

        Ok(Response::new(request.id.clone(), result_map(result)).into())
    }
}

pub struct ResourceReadHandler {
    chain: Arc<ResourceChain>,
}

impl ResourceReadHandler {
    pub fn new(chain: Arc<ResourceChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl RequestHandler for ResourceReadHandler {
    fn supports(&self, request: &Request) -> bool {
        request.method == "resources/read"
    }

    async fn create_response(&self, request: &Request) -> Result<Reply, McpError> {
        let input = ResourceRead {
            uri: required_str(request, "uri")?.to_string(),
        };

        match self.chain.read(&input).await {
            Ok(contents) => {
                let mut content = json!({ "uri": contents.uri, "text": contents.text });
                if let Some(mime_type) = contents.mime_type {
                    content["mimeType"] = json!(mime_type);
                }
                let result = json!({ "contents": [content] });
                Ok(Response::new(request.id.clone(), result_map(result)).into())
            }
            Err(err @ McpError::NotFound { .. }) => Err(err),
            Err(err) => {
                error!(
                    request_id = %request.id,
                    uri = %input.uri,
                    error = %error_chain(&err),
                    "resource read failed"
                );
                Ok(ErrorResponse::internal_error(
                    request.id.clone(),
                    "Error while reading resource",
                )
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::mcp::message::ErrorCode;
    use crate::test_support::{FailingResource, StaticResource};

    fn chain() -> Arc<ResourceChain> {
        Arc::new(
            ResourceChain::new()
                .with(StaticResource::new("mem://one", "one", "first"))
                .with(StaticResource::new("mem://two", "two", "second"))
                .with(FailingResource::new("mem://bad")),
        )
    }

    fn request(method: &str, params: Value) -> Request {
        Request::new(8, method, Some(result_map(params)))
    }

    #[tokio::test]
    async fn lists_resource_metadata() {
        let handler = ResourceListHandler::new(chain(), 10);
        let Reply::Response(response) = handler
            .create_response(&request("resources/list", json!({})))
            .await
            .expect("reply")
        else {
            panic!("expected response");
        };
        let result = Value::Object(response.result);

        assert_eq!(
            result["resources"][0],
            json!({ "uri": "mem://one", "name": "one", "mimeType": "text/plain", "size": 5 })
        );
        assert_eq!(result["resources"].as_array().map(Vec::len), Some(2));
        assert!(result.get("nextCursor").is_none());
    }

    #[tokio::test]
    async fn cursor_and_page_size_bound_the_listing() {
        let handler = ResourceListHandler::new(chain(), 1);
        let Reply::Response(response) = handler
            .create_response(&request("resources/list", json!({ "cursor": "one" })))
            .await
            .expect("reply")
        else {
            panic!("expected response");
        };
        let result = Value::Object(response.result);

        assert_eq!(result["resources"][0]["uri"], "mem://two");
        assert_eq!(result["nextCursor"], "two");
    }

    #[tokio::test]
    async fn reads_text_contents() {
        let handler = ResourceReadHandler::new(chain());
        let Reply::Response(response) = handler
            .create_response(&request("resources/read", json!({ "uri": "mem://two" })))
            .await
            .expect("reply")
        else {
            panic!("expected response");
        };

        assert_eq!(
            Value::Object(response.result),
            json!({ "contents": [{ "uri": "mem://two", "mimeType": "text/plain", "text": "second" }] })
        );
    }

    #[tokio::test]
    async fn missing_uri_parameter_and_unknown_uri() {
        let handler = ResourceReadHandler::new(chain());

        let err = handler
            .create_response(&request("resources/read", json!({})))
            .await
            .expect_err("invalid");
        assert!(matches!(err, McpError::InvalidArgument(_)));

        let err = handler
            .create_response(&request("resources/read", json!({ "uri": "mem://nope" })))
            .await
            .expect_err("not found");
        assert!(matches!(err, McpError::NotFound { .. }));
    }

    #[tokio::test]
    async fn failing_reader_is_internal_error() {
        let handler = ResourceReadHandler::new(chain());
        let reply = handler
            .create_response(&request("resources/read", json!({ "uri": "mem://bad" })))
            .await
            .expect("reply");

        assert!(matches!(
            reply,
            Reply::Error(ref error) if error.code == ErrorCode::InternalError
                && error.message == "Error while reading resource"
        ));
    }
}
