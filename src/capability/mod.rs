//! Application-supplied tools, prompts and resources
//!
//! Items are polymorphic by capability: each item exposes the behaviours it
//! has (metadata, execution) through optional accessors, and the chains route
//! calls to the first item that can serve them.

pub mod chain;
pub mod pagination;
pub mod prompt;
pub mod resource;
pub mod tool;

pub use chain::Chain;
pub use pagination::Page;
pub use prompt::{PromptChain, PromptGet, PromptGetter, PromptItem, PromptMetadata};
pub use resource::{ResourceChain, ResourceItem, ResourceMetadata, ResourceRead, ResourceReader};
pub use tool::{ToolCall, ToolChain, ToolExecutor, ToolItem, ToolMetadata, ToolOutput};

/// Stable key of a capability: a tool or prompt name, or a resource URI.
pub trait Identifier {
    fn identifier(&self) -> &str;
}
