use std::sync::Arc;

use mcp_protocol_core::{
    build_app, builtin,
    config::{Config, Transport},
    logging,
    mcp::server::JsonRpcHandler,
    transport, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging()?;

    let config = Config::from_env()?;
    let server_info = config.server_info();
    let handler = Arc::new(JsonRpcHandler::standard(
        server_info.clone(),
        Arc::new(builtin::tools()),
        Arc::new(builtin::prompts()),
        Arc::new(builtin::resources(&server_info)),
        config.page_size,
    ));

    info!(
        name = %server_info.name,
        version = %server_info.version,
        transport = %config.transport,
        "server starting"
    );

    match config.transport {
        Transport::Stdio => transport::serve_stdio(&handler).await?,
        Transport::Http => {
            let bind_socket = config.bind_socket()?;
            let app = build_app(AppState::new(handler, server_info));
            let listener = tokio::net::TcpListener::bind(bind_socket).await?;

            info!(
                bind_addr = %config.bind_addr,
                bind_port = config.bind_port,
                "http transport listening"
            );

            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}
