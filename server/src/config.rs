//! Configuration management for the Order API server.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use thiserror::Error;

/// Environment variable for the listen host.
pub const HOST_ENV: &str = "ORDER_API_HOST";

/// Environment variable for the listen port.
pub const PORT_ENV: &str = "ORDER_API_PORT";

/// Listen host when `ORDER_API_HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Listen port when `ORDER_API_PORT` is unset.
pub const DEFAULT_PORT: u16 = 8088;

/// Tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "order_api_server=info,order_api_web=info,tower_http=info";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `ORDER_API_PORT` is not a valid port number
    #[error("ORDER_API_PORT must be a port number, got {value:?}")]
    InvalidPort {
        /// The rejected value
        value: String,
        /// Parse failure
        #[source]
        source: ParseIntError,
    },

    /// `ORDER_API_HOST` is set but empty
    #[error("ORDER_API_HOST must not be empty")]
    EmptyHost,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup(HOST_ENV) {
            Some(host) if host.trim().is_empty() => return Err(ConfigError::EmptyHost),
            Some(host) => host.trim().to_string(),
            None => DEFAULT_HOST.to_string(),
        };

        let port = match lookup(PORT_ENV) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    /// `host:port`, with IPv6 hosts bracketed.
    #[must_use]
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
