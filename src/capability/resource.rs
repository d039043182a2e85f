//! Resources: URI-addressed content for `resources/list` and `resources/read`

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::capability::{Chain, Identifier, Page};
use crate::errors::{BoxError, CapabilityKind, McpError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRead {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: Option<String>,
    pub text: String,
}

impl ResourceContents {
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: None,
            text: text.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Resource descriptor. The identifier is the URI; `name` is the display name
/// and the pagination cursor.
pub trait ResourceMetadata: Identifier + Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    fn mime_type(&self) -> Option<&str> {
        None
    }

    fn size(&self) -> Option<u64> {
        None
    }
}

#[async_trait]
pub trait ResourceReader: Identifier + Send + Sync {
    async fn read(&self, input: &ResourceRead) -> Result<ResourceContents, BoxError>;
}

pub trait ResourceItem: Send + Sync {
    fn as_metadata(&self) -> Option<&dyn ResourceMetadata> {
        None
    }

    fn as_reader(&self) -> Option<&dyn ResourceReader> {
        None
    }
}

#[derive(Default)]
pub struct ResourceChain {
    items: Chain<dyn ResourceItem>,
}

impl ResourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item: impl ResourceItem + 'static) -> Self {
        self.push(Arc::new(item));
        self
    }

    pub fn push(&mut self, item: Arc<dyn ResourceItem>) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn metadata(&self) -> Vec<&dyn ResourceMetadata> {
        self.items.iter().filter_map(|item| item.as_metadata()).collect()
    }

    /// One page of metadata, resuming after the resource named `cursor`.
    pub fn metadata_page<'a>(
        &'a self,
        page_size: usize,
        cursor: Option<&str>,
    ) -> impl Iterator<Item = Result<&'a dyn ResourceMetadata, McpError>> + 'a {
        Page::new(
            self.items.iter().filter_map(|item| item.as_metadata()),
            page_size,
            cursor,
            |item, cursor| item.name() == cursor,
        )
    }

    pub async fn read(&self, input: &ResourceRead) -> Result<ResourceContents, McpError> {
        let reader = self
            .items
            .find_map(|item| {
                item.as_reader()
                    .filter(|reader| reader.identifier() == input.uri)
            })
            .ok_or_else(|| McpError::not_found(CapabilityKind::Resource, &input.uri))?;

        reader
            .read(input)
            .await
            .map_err(|source| McpError::ResourceExecution {
                request: input.clone(),
                source,
            })
    }
}
