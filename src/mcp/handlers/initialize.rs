use async_trait::async_trait;
use serde_json::json;

use super::{result_map, RequestHandler};
use crate::errors::McpError;
use crate::mcp::message::{Reply, Request, Response};
use crate::mcp::server::ServerInfo;

pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Answers `initialize` with a fixed capability descriptor. Client params are
/// not negotiated.
pub struct InitializeHandler {
    server_info: ServerInfo,
}

impl InitializeHandler {
    pub fn new(server_info: ServerInfo) -> Self {
        Self { server_info }
    }
}

#[async_trait]
impl RequestHandler for InitializeHandler {
    fn supports(&self, request: &Request) -> bool {
        request.method == "initialize"
    }

    async fn create_response(&self, request: &Request) -> Result<Reply, McpError> {
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "prompts": { "listChanged": false },
                "tools": { "listChanged": false },
                "resources": { "listChanged": false, "subscribe": false }
            },
            "serverInfo": {
                "name": self.server_info.name,
                "version": self.server_info.version
            }
        });

        Ok(Response::new(request.id.clone(), result_map(result)).into())
    }
}
