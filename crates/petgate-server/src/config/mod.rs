// Gateway configuration loaded from environment variables.
// Decision: One immutable struct built at startup and handed to the router builder

use axum::http::HeaderValue;
use std::net::SocketAddr;

use crate::auth::config::{AuthConfig, ConfigError};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_SERVER_HEADER: &str = "petgate/1.0";

/// Complete gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,
    /// Value of the `Server` header stamped on every response
    pub server_header: HeaderValue,
    pub auth: AuthConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            server_header: HeaderValue::from_static(DEFAULT_SERVER_HEADER),
            auth: AuthConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: bind_addr.clone(),
            })?;

        let server_header = match lookup("SERVER_HEADER") {
            Some(value) => HeaderValue::from_str(&value).map_err(|_| ConfigError::Invalid {
                key: "SERVER_HEADER",
                value,
            })?,
            None => HeaderValue::from_static(DEFAULT_SERVER_HEADER),
        };

        let auth = AuthConfig::from_lookup(&lookup)?;

        Ok(Self {
            bind_addr,
            server_header,
            auth,
        })
    }
}
