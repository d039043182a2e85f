//! Tracing setup and HTTP exchange summaries

use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. Output goes to stderr so stdout stays a
/// clean protocol channel for the stdio transport.
pub fn init_logging() -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish()
        .try_init()
}

/// What an HTTP exchange amounted to, as far as the summary line cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    /// `/mcp` answered with a JSON-RPC body.
    Replied,
    /// `/mcp` had nothing to send back (notifications, dropped requests).
    Silent,
    /// Health and discovery endpoints.
    Metadata,
    Unrouted,
    Other,
}

impl Exchange {
    pub fn classify(path: &str, status: StatusCode) -> Self {
        match path {
            "/mcp" if status == StatusCode::NO_CONTENT => Self::Silent,
            "/mcp" => Self::Replied,
            "/health" | "/.well-known/mcp" => Self::Metadata,
            _ if status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED => {
                Self::Unrouted
            }
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replied => "replied",
            Self::Silent => "silent",
            Self::Metadata => "metadata",
            Self::Unrouted => "unrouted",
            Self::Other => "other",
        }
    }
}

fn content_length(request: &Request) -> Option<u64> {
    request
        .headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let body_bytes = content_length(&request);
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();
    let exchange = Exchange::classify(&path, status);

    match exchange {
        Exchange::Metadata => debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = elapsed_ms,
            "metadata request"
        ),
        Exchange::Unrouted => warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            "unrouted request"
        ),
        Exchange::Replied | Exchange::Silent | Exchange::Other => info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            exchange = exchange.as_str(),
            body_bytes = ?body_bytes,
            duration_ms = elapsed_ms,
            "request summary"
        ),
    }

    if status.is_server_error() {
        warn!(method = %method, path = %path, status = status.as_u16(), "request failed");
    }

    response
}
