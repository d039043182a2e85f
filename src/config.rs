use std::{env, fmt, net::SocketAddr, str::FromStr};

use thiserror::Error;

use crate::mcp::handlers::prompts::DEFAULT_PAGE_SIZE;
use crate::mcp::server::ServerInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidTransport(value.to_string())),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub transport: Transport,
    pub bind_addr: String,
    pub bind_port: u16,
    pub server_name: String,
    pub server_version: String,
    pub page_size: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MCP_TRANSPORT must be \"stdio\" or \"http\", got {0:?}")]
    InvalidTransport(String),
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("MCP_PAGE_SIZE must be a positive integer")]
    InvalidPageSize,
    #[error("MCP_SERVER_NAME must not be empty")]
    EmptyServerName,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let transport = non_empty("MCP_TRANSPORT")
            .map(|value| value.parse::<Transport>())
            .transpose()?
            .unwrap_or(Transport::Stdio);
        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = non_empty("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);
        let server_name = match lookup("MCP_SERVER_NAME") {
            Some(name) if name.trim().is_empty() => return Err(ConfigError::EmptyServerName),
            Some(name) => name.trim().to_string(),
            None => env!("CARGO_PKG_NAME").to_string(),
        };
        let server_version =
            non_empty("MCP_SERVER_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
        let page_size = non_empty("MCP_PAGE_SIZE")
            .map(|value| {
                value
                    .parse::<usize>()
                    .ok()
                    .filter(|size| *size > 0)
                    .ok_or(ConfigError::InvalidPageSize)
            })
            .transpose()?
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let config = Self {
            transport,
            bind_addr,
            bind_port,
            server_name,
            server_version,
            page_size,
        };

        if config.transport == Transport::Http {
            let _ = config.bind_socket()?;
        }
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }

    pub fn server_info(&self) -> ServerInfo {
        ServerInfo::new(&self.server_name, &self.server_version)
    }
}
