//! Prompts: paginated metadata for `prompts/list`, rendering for `prompts/get`

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::capability::{Chain, Identifier, Page};
use crate::errors::{BoxError, CapabilityKind, McpError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptGet {
    pub name: String,
    pub arguments: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
}

impl PromptArgument {
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, description)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub text: String,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptResult {
    pub description: Option<String>,
    pub messages: Vec<PromptMessage>,
}

pub trait PromptMetadata: Identifier + Send + Sync {
    fn description(&self) -> Option<&str> {
        None
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        Vec::new()
    }
}

#[async_trait]
pub trait PromptGetter: Identifier + Send + Sync {
    async fn get(&self, input: &PromptGet) -> Result<PromptResult, BoxError>;
}

pub trait PromptItem: Send + Sync {
    fn as_metadata(&self) -> Option<&dyn PromptMetadata> {
        None
    }

    fn as_getter(&self) -> Option<&dyn PromptGetter> {
        None
    }
}

#[derive(Default)]
pub struct PromptChain {
    items: Chain<dyn PromptItem>,
}

impl PromptChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item: impl PromptItem + 'static) -> Self {
        self.push(Arc::new(item));
        self
    }

    pub fn push(&mut self, item: Arc<dyn PromptItem>) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn metadata(&self) -> Vec<&dyn PromptMetadata> {
        self.items.iter().filter_map(|item| item.as_metadata()).collect()
    }

    /// One page of metadata, resuming after the prompt named `cursor`.
    pub fn metadata_page<'a>(
        &'a self,
        page_size: usize,
        cursor: Option<&str>,
    ) -> impl Iterator<Item = Result<&'a dyn PromptMetadata, McpError>> + 'a {
        Page::new(
            self.items.iter().filter_map(|item| item.as_metadata()),
            page_size,
            cursor,
            |item, cursor| item.identifier() == cursor,
        )
    }

    /// Fails with `InvalidArgument` if `input` lacks an argument that the
    /// first metadata item named `input.name` declares as required.
    pub fn check_arguments(&self, input: &PromptGet) -> Result<(), McpError> {
        let Some(metadata) = self.items.find_map(|item| {
            item.as_metadata()
                .filter(|metadata| metadata.identifier() == input.name)
        }) else {
            return Ok(());
        };

        match metadata
            .arguments()
            .into_iter()
            .find(|argument| argument.required && !input.arguments.contains_key(&argument.name))
        {
            Some(missing) => Err(McpError::invalid_argument(format!(
                "missing required argument \"{}\" for prompt \"{}\"",
                missing.name, input.name
            ))),
            None => Ok(()),
        }
    }

    pub async fn get(&self, input: &PromptGet) -> Result<PromptResult, McpError> {
        let getter = self
            .items
            .find_map(|item| {
                item.as_getter()
                    .filter(|getter| getter.identifier() == input.name)
            })
            .ok_or_else(|| McpError::not_found(CapabilityKind::Prompt, &input.name))?;
        self.check_arguments(input)?;

        getter
            .get(input)
            .await
            .map_err(|source| McpError::PromptExecution {
                request: input.clone(),
                source,
            })
    }
}
