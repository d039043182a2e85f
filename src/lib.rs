use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod builtin;
pub mod capability;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod transport;

#[cfg(test)]
mod test_support;

use mcp::server::{JsonRpcHandler, ServerInfo};

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<JsonRpcHandler>,
    pub server_info: ServerInfo,
}

impl AppState {
    pub fn new(handler: Arc<JsonRpcHandler>, server_info: ServerInfo) -> Self {
        Self {
            handler,
            server_info,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
