//! Capabilities served by the bundled binary

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::capability::prompt::{PromptArgument, PromptMessage, PromptResult};
use crate::capability::resource::ResourceContents;
use crate::capability::{
    Identifier, PromptChain, PromptGet, PromptGetter, PromptItem, PromptMetadata, ResourceChain,
    ResourceItem, ResourceMetadata, ResourceRead, ResourceReader, ToolCall, ToolChain,
    ToolExecutor, ToolItem, ToolMetadata, ToolOutput,
};
use crate::errors::BoxError;
use crate::mcp::server::ServerInfo;

pub const SERVER_INFO_URI: &str = "mcp://server/info";

/// Returns its `text` argument unchanged.
pub struct EchoTool;

impl Identifier for EchoTool {
    fn identifier(&self) -> &str {
        "echo"
    }
}

impl ToolMetadata for EchoTool {
    fn description(&self) -> &str {
        "Echo the given text back to the caller"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text to echo" }
            },
            "required": ["text"]
        })
    }
}

#[async_trait]
impl ToolExecutor for EchoTool {
    async fn call(&self, input: &ToolCall) -> Result<ToolOutput, BoxError> {
        Ok(match input.argument("text").and_then(Value::as_str) {
            Some(text) => ToolOutput::text(text),
            None => ToolOutput::error("argument \"text\" must be a string"),
        })
    }
}

impl ToolItem for EchoTool {
    fn as_metadata(&self) -> Option<&dyn ToolMetadata> {
        Some(self)
    }

    fn as_executor(&self) -> Option<&dyn ToolExecutor> {
        Some(self)
    }
}

/// Current UTC time in RFC 3339 format. Takes no arguments.
pub struct UtcNowTool;

impl Identifier for UtcNowTool {
    fn identifier(&self) -> &str {
        "utc_now"
    }
}

impl ToolMetadata for UtcNowTool {
    fn description(&self) -> &str {
        "Current UTC time in RFC 3339 format"
    }
}

#[async_trait]
impl ToolExecutor for UtcNowTool {
    async fn call(&self, _input: &ToolCall) -> Result<ToolOutput, BoxError> {
        Ok(ToolOutput::text(
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        ))
    }
}

impl ToolItem for UtcNowTool {
    fn as_metadata(&self) -> Option<&dyn ToolMetadata> {
        Some(self)
    }

    fn as_executor(&self) -> Option<&dyn ToolExecutor> {
        Some(self)
    }
}

pub struct SummarizePrompt;

impl Identifier for SummarizePrompt {
    fn identifier(&self) -> &str {
        "summarize"
    }
}

impl PromptMetadata for SummarizePrompt {
    fn description(&self) -> Option<&str> {
        Some("Ask the model for a concise summary of a text")
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        vec![
            PromptArgument::required("text", "Text to summarize"),
            PromptArgument::optional("style", "Desired style, e.g. \"bullet points\""),
        ]
    }
}

#[async_trait]
impl PromptGetter for SummarizePrompt {
    async fn get(&self, input: &PromptGet) -> Result<PromptResult, BoxError> {
        let text = input
            .arguments
            .get("text")
            .ok_or("missing required argument \"text\"")?;

        let instruction = match input.arguments.get("style") {
            Some(style) => format!("Summarize the following text as {style}:"),
            None => "Summarize the following text concisely:".to_string(),
        };

        Ok(PromptResult {
            description: Some("Summary request".to_string()),
            messages: vec![PromptMessage::user(format!("{instruction}\n\n{text}"))],
        })
    }
}

impl PromptItem for SummarizePrompt {
    fn as_metadata(&self) -> Option<&dyn PromptMetadata> {
        Some(self)
    }

    fn as_getter(&self) -> Option<&dyn PromptGetter> {
        Some(self)
    }
}

/// JSON document describing this server.
pub struct ServerInfoResource {
    document: String,
}

impl ServerInfoResource {
    pub fn new(server_info: &ServerInfo) -> Self {
        let document = json!({
            "name": server_info.name,
            "version": server_info.version,
        })
        .to_string();
        Self { document }
    }
}

impl Identifier for ServerInfoResource {
    fn identifier(&self) -> &str {
        SERVER_INFO_URI
    }
}

impl ResourceMetadata for ServerInfoResource {
    fn name(&self) -> &str {
        "server-info"
    }

    fn description(&self) -> Option<&str> {
        Some("Name and version of this server")
    }

    fn mime_type(&self) -> Option<&str> {
        Some("application/json")
    }

    fn size(&self) -> Option<u64> {
        u64::try_from(self.document.len()).ok()
    }
}

#[async_trait]
impl ResourceReader for ServerInfoResource {
    async fn read(&self, input: &ResourceRead) -> Result<ResourceContents, BoxError> {
        Ok(ResourceContents::text(&input.uri, &self.document).with_mime_type("application/json"))
    }
}

impl ResourceItem for ServerInfoResource {
    fn as_metadata(&self) -> Option<&dyn ResourceMetadata> {
        Some(self)
    }

    fn as_reader(&self) -> Option<&dyn ResourceReader> {
        Some(self)
    }
}

pub fn tools() -> ToolChain {
    ToolChain::new().with(EchoTool).with(UtcNowTool)
}

pub fn prompts() -> PromptChain {
    PromptChain::new().with(SummarizePrompt)
}

pub fn resources(server_info: &ServerInfo) -> ResourceChain {
    ResourceChain::new().with(ServerInfoResource::new(server_info))
}
