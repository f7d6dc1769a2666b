//! Listener configuration

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Result, ServerError};

/// Where the HTTP listener binds and how long a request may run
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (e.g. "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port; `0` picks an ephemeral port
    pub port: u16,
    /// Requests still running after this are answered with 408
    pub request_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Parse the socket address from host and port
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 8080)
    }
}
