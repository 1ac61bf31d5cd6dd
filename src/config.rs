use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Service address used when `SERVICE_ADDRESS` is not set.
pub const DEFAULT_SERVICE_ADDRESS: &str = "catalog.products";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub auth_token: String,
    pub service_address: String,
    pub request_timeout: Duration,
    pub store_buffer: usize,
    pub dispatch_buffer: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let auth_token = lookup("AUTH_TOKEN")
            .filter(|token| !token.is_empty())
            .context("AUTH_TOKEN must be set")?;

        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            auth_token,
            service_address: lookup("SERVICE_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVICE_ADDRESS.to_string()),
            request_timeout: Duration::from_millis(
                lookup("REQUEST_TIMEOUT_MS")
                    .unwrap_or_else(|| "5000".to_string())
                    .parse()
                    .context("REQUEST_TIMEOUT_MS must be a valid number")?,
            ),
            store_buffer: lookup("STORE_BUFFER")
                .unwrap_or_else(|| "64".to_string())
                .parse()
                .context("STORE_BUFFER must be a valid number")?,
            dispatch_buffer: lookup("DISPATCH_BUFFER")
                .unwrap_or_else(|| "64".to_string())
                .parse()
                .context("DISPATCH_BUFFER must be a valid number")?,
        })
    }
}
