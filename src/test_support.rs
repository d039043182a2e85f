//! Capability fixtures shared by unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::capability::prompt::{PromptArgument, PromptMessage, PromptResult};
use crate::capability::resource::ResourceContents;
use crate::capability::{
    Identifier, PromptChain, PromptGet, PromptGetter, PromptItem, PromptMetadata, ResourceChain,
    ResourceItem, ResourceMetadata, ResourceRead, ResourceReader, ToolCall, ToolChain,
    ToolExecutor, ToolItem, ToolMetadata, ToolOutput,
};
use crate::errors::BoxError;
use crate::mcp::server::{JsonRpcHandler, ServerInfo};

pub struct StaticTool {
    name: String,
    reply: String,
    schema: Value,
}

impl StaticTool {
    pub fn new(name: &str, reply: &str) -> Self {
        Self {
            name: name.to_string(),
            reply: reply.to_string(),
            schema: json!({
                "type": "object",
                "properties": { "text": { "type": "string" } }
            }),
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }
}

impl Identifier for StaticTool {
    fn identifier(&self) -> &str {
        &self.name
    }
}

impl ToolMetadata for StaticTool {
    fn description(&self) -> &str {
        "returns a fixed reply"
    }

    fn input_schema(&self) -> Value {
        self.schema.clone()
    }
}

#[async_trait]
impl ToolExecutor for StaticTool {
    async fn call(&self, input: &ToolCall) -> Result<ToolOutput, BoxError> {
        if input.argument("fail_softly").is_some() {
            return Ok(ToolOutput::error(self.reply.clone()));
        }
        Ok(ToolOutput::text(self.reply.clone()))
    }
}

impl ToolItem for StaticTool {
    fn as_metadata(&self) -> Option<&dyn ToolMetadata> {
        Some(self)
    }

    fn as_executor(&self) -> Option<&dyn ToolExecutor> {
        Some(self)
    }
}

pub struct MetadataOnlyTool {
    name: String,
}

impl MetadataOnlyTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Identifier for MetadataOnlyTool {
    fn identifier(&self) -> &str {
        &self.name
    }
}

impl ToolMetadata for MetadataOnlyTool {
    fn description(&self) -> &str {
        "listed but not callable"
    }
}

impl ToolItem for MetadataOnlyTool {
    fn as_metadata(&self) -> Option<&dyn ToolMetadata> {
        Some(self)
    }
}

pub struct FailingTool {
    name: String,
}

impl FailingTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Identifier for FailingTool {
    fn identifier(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ToolExecutor for FailingTool {
    async fn call(&self, _input: &ToolCall) -> Result<ToolOutput, BoxError> {
        Err("boom".into())
    }
}

impl ToolItem for FailingTool {
    fn as_executor(&self) -> Option<&dyn ToolExecutor> {
        Some(self)
    }
}

pub struct StaticPrompt {
    name: String,
    text: String,
    required: Option<String>,
}

impl StaticPrompt {
    pub fn new(name: &str) -> Self {
        Self::with_text(name, &format!("prompt {name}"))
    }

    pub fn with_text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            required: None,
        }
    }

    /// Declares `argument` as required in addition to the optional `topic`.
    pub fn requiring(name: &str, argument: &str) -> Self {
        Self {
            required: Some(argument.to_string()),
            ..Self::new(name)
        }
    }
}

impl Identifier for StaticPrompt {
    fn identifier(&self) -> &str {
        &self.name
    }
}

impl PromptMetadata for StaticPrompt {
    fn description(&self) -> Option<&str> {
        Some("fixed prompt")
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        let mut arguments = vec![PromptArgument::optional("topic", "what to talk about")];
        if let Some(required) = &self.required {
            arguments.push(PromptArgument::required(required.as_str(), "must be supplied"));
        }
        arguments
    }
}

#[async_trait]
impl PromptGetter for StaticPrompt {
    async fn get(&self, input: &PromptGet) -> Result<PromptResult, BoxError> {
        let text = match input.arguments.get("topic") {
            Some(topic) => format!("{} about {topic}", self.text),
            None => self.text.clone(),
        };
        Ok(PromptResult {
            description: Some("fixed prompt".to_string()),
            messages: vec![PromptMessage::user(text)],
        })
    }
}

impl PromptItem for StaticPrompt {
    fn as_metadata(&self) -> Option<&dyn PromptMetadata> {
        Some(self)
    }

    fn as_getter(&self) -> Option<&dyn PromptGetter> {
        Some(self)
    }
}

pub struct FailingPrompt {
    name: String,
}

impl FailingPrompt {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Identifier for FailingPrompt {
    fn identifier(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl PromptGetter for FailingPrompt {
    async fn get(&self, _input: &PromptGet) -> Result<PromptResult, BoxError> {
        Err("template missing".into())
    }
}

impl PromptItem for FailingPrompt {
    fn as_getter(&self) -> Option<&dyn PromptGetter> {
        Some(self)
    }
}

pub struct StaticResource {
    uri: String,
    name: String,
    text: String,
}

impl StaticResource {
    pub fn new(uri: &str, name: &str, text: &str) -> Self {
        Self {
            uri: uri.to_string(),
            name: name.to_string(),
            text: text.to_string(),
        }
    }
}

impl Identifier for StaticResource {
    fn identifier(&self) -> &str {
        &self.uri
    }
}

impl ResourceMetadata for StaticResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        Some("text/plain")
    }

    fn size(&self) -> Option<u64> {
        u64::try_from(self.text.len()).ok()
    }
}

#[async_trait]
impl ResourceReader for StaticResource {
    async fn read(&self, _input: &ResourceRead) -> Result<ResourceContents, BoxError> {
        Ok(ResourceContents::text(&self.uri, &self.text).with_mime_type("text/plain"))
    }
}

impl ResourceItem for StaticResource {
    fn as_metadata(&self) -> Option<&dyn ResourceMetadata> {
        Some(self)
    }

    fn as_reader(&self) -> Option<&dyn ResourceReader> {
        Some(self)
    }
}

pub struct FailingResource {
    uri: String,
}

impl FailingResource {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
        }
    }
}

impl Identifier for FailingResource {
    fn identifier(&self) -> &str {
        &self.uri
    }
}

#[async_trait]
impl ResourceReader for FailingResource {
    async fn read(&self, _input: &ResourceRead) -> Result<ResourceContents, BoxError> {
        Err("permission denied".into())
    }
}

impl ResourceItem for FailingResource {
    fn as_reader(&self) -> Option<&dyn ResourceReader> {
        Some(self)
    }
}

/// Dispatcher wired with a small, known set of capabilities and page size 2.
pub fn handler() -> JsonRpcHandler {
    let tools = ToolChain::new()
        .with(StaticTool::new("echo", "hello"))
        .with(StaticTool::new("bare", "ok").with_schema(json!({})))
        .with(FailingTool::new("broken"));
    let prompts = PromptChain::new()
        .with(StaticPrompt::new("p1"))
        .with(StaticPrompt::new("p2"))
        .with(StaticPrompt::new("p3"))
        .with(FailingPrompt::new("bad-prompt"));
    let resources = ResourceChain::new()
        .with(StaticResource::new("mem://one", "one", "first"))
        .with(StaticResource::new("mem://two", "two", "second"))
        .with(FailingResource::new("mem://bad"));

    JsonRpcHandler::standard(
        ServerInfo::new("test-server", "1.2.3"),
        Arc::new(tools),
        Arc::new(prompts),
        Arc::new(resources),
        2,
    )
}
