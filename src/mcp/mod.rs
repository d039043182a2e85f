//! Model Context Protocol message handling
//!
//! Message model and decoding, per-method handlers, error translation and the
//! dispatcher that ties them together.

pub mod factory;
pub mod handlers;
pub mod message;
pub mod rpc;
pub mod server;
