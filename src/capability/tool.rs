//! Tools: metadata for `tools/list` and execution for `tools/call`

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::capability::{Chain, Identifier};
use crate::errors::{BoxError, CapabilityKind, McpError};

/// Input of a tool execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCall {
    /// Locally unique id for log correlation; not the JSON-RPC request id.
    pub correlation_id: String,
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// A result the tool itself reports as failed; still a successful reply.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub trait ToolMetadata: Identifier + Send + Sync {
    fn description(&self) -> &str;

    /// JSON schema of the arguments. An empty object or `null` is listed
    /// with a fallback schema.
    fn input_schema(&self) -> Value {
        Value::Object(Map::new())
    }
}

#[async_trait]
pub trait ToolExecutor: Identifier + Send + Sync {
    async fn call(&self, input: &ToolCall) -> Result<ToolOutput, BoxError>;
}

/// A registered tool exposes whichever capabilities it implements.
pub trait ToolItem: Send + Sync {
    fn as_metadata(&self) -> Option<&dyn ToolMetadata> {
        None
    }

    fn as_executor(&self) -> Option<&dyn ToolExecutor> {
        None
    }
}

#[derive(Default)]
pub struct ToolChain {
    items: Chain<dyn ToolItem>,
}

impl ToolChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item: impl ToolItem + 'static) -> Self {
        self.push(Arc::new(item));
        self
    }

    pub fn push(&mut self, item: Arc<dyn ToolItem>) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every metadata-capable item, in registration order.
    pub fn metadata(&self) -> Vec<&dyn ToolMetadata> {
        self.items.iter().filter_map(|item| item.as_metadata()).collect()
    }

    pub async fn call(&self, input: &ToolCall) -> Result<ToolOutput, McpError> {
        let executor = self
            .items
            .find_map(|item| {
                item.as_executor()
                    .filter(|executor| executor.identifier() == input.name)
            })
            .ok_or_else(|| McpError::not_found(CapabilityKind::Tool, &input.name))?;

        executor
            .call(input)
            .await
            .map_err(|source| McpError::ToolExecution {
                call: input.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use serde_json::json;

    use super::*;
    use crate::test_support::{FailingTool, MetadataOnlyTool, StaticTool};

    fn call(name: &str) -> ToolCall {
        ToolCall {
            correlation_id: "test".to_string(),
            name: name.to_string(),
            arguments: Map::new(),
        }
    }

    #[tokio::test]
    async fn first_registered_tool_wins() {
        let chain = ToolChain::new()
            .with(StaticTool::new("dup", "first"))
            .with(StaticTool::new("dup", "second"));

        let output = chain.call(&call("dup")).await.expect("call");
        assert_eq!(output, ToolOutput::text("first"));
    }

    #[tokio::test]
    async fn metadata_only_item_is_not_executable() {
        let chain = ToolChain::new()
            .with(MetadataOnlyTool::new("listed"))
            .with(StaticTool::new("other", "x"));

        let err = chain.call(&call("listed")).await.expect_err("not found");
        assert!(matches!(
            err,
            McpError::NotFound { kind: CapabilityKind::Tool, ref key } if key == "listed"
        ));
        assert_eq!(chain.metadata().len(), 2);
    }

    #[tokio::test]
    async fn execution_failure_is_wrapped_with_input() {
        let chain = ToolChain::new().with(FailingTool::new("broken"));
        let mut input = call("broken");
        input.arguments.insert("path".to_string(), json!("/tmp"));

        let err = chain.call(&input).await.expect_err("execution failure");
        assert!(err.is_execution());
        assert_eq!(err.source().expect("cause").to_string(), "boom");
        match err {
            McpError::ToolExecution { call, .. } => assert_eq!(call, input),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn metadata_keeps_registration_order() {
        let chain = ToolChain::new()
            .with(StaticTool::new("zeta", "z"))
            .with(StaticTool::new("alpha", "a"));

        let names: Vec<_> = chain.metadata().into_iter().map(|m| m.identifier()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }
}
