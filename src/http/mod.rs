//! HTTP transport for the Model Context Protocol
//!
//! Exposes the dispatcher on `POST /mcp` alongside health and discovery endpoints.

pub mod handlers;
