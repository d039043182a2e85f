use async_trait::async_trait;

use super::RequestHandler;
use crate::errors::McpError;
use crate::mcp::message::{Reply, Request, Response};

pub struct PingHandler;

#[async_trait]
impl RequestHandler for PingHandler {
    fn supports(&self, request: &Request) -> bool {
        request.method == "ping"
    }

    async fn create_response(&self, request: &Request) -> Result<Reply, McpError> {
        Ok(Response::empty(request.id.clone()).into())
    }
}
