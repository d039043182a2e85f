//! Axum HTTP handlers for the web server
//!
//! Provides the Model Context Protocol endpoint and general metadata endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::mcp::message::{ErrorResponse, Reply};
use crate::mcp::rpc::encode_reply;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: String,
    pub version: String,
    pub mcp_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery(State(state): State<AppState>) -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: state.server_info.name.clone(),
        version: state.server_info.version.clone(),
        mcp_endpoint: "/mcp",
    })
}

/// One JSON-RPC message or batch per POST. Requests that yield no reply
/// (notifications, dropped messages) are answered with `204 No Content`.
pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let reply = match std::str::from_utf8(&body) {
        Ok(raw) => state.handler.process(raw).await,
        Err(err) => Some(encode_reply(&Reply::from(ErrorResponse::parse_error(
            err.to_string(),
        )))),
    };

    match reply {
        Some(reply) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            reply,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
