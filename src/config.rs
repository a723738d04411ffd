use std::env;
use std::net::SocketAddr;
use tokio::net::lookup_host;

use crate::error::{AppError, AppResult};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Server settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(env::var("HOST").ok(), env::var("PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> AppResult<Self> {
        let port = match port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("PORT '{}' is invalid: {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// Resolves `HOST` to the first matching address, so names like
    /// `localhost` work as well as IP literals.
    pub async fn socket_addr(&self) -> AppResult<SocketAddr> {
        lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| AppError::Config(format!("invalid host {}: {}", self.host, e)))?
            .next()
            .ok_or_else(|| AppError::Config(format!("host {} has no addresses", self.host)))
    }
}
