//! Startup configuration from flags and environment variables.
//!
//! Every flag has an environment fallback. Validation happens once at
//! startup; any problem here is fatal.

use std::fmt;

use clap::{Parser, ValueEnum};
use thiserror::Error;

#[derive(Parser)]
#[command(
    name = "immich-exporter",
    version,
    about = "Prometheus exporter for the Immich admin API"
)]
pub struct Cli {
    /// Base URL of the Immich server, e.g. http://immich:2283.
    #[arg(long, env = "IMMICH_URL")]
    pub immich_url: String,

    /// Admin API key, sent as the x-api-key header.
    #[arg(long, env = "IMMICH_API_KEY", hide_env_values = true)]
    pub immich_api_key: String,

    /// Address to serve /metrics and /health on. ":port" binds all interfaces.
    #[arg(long, env = "LISTEN_ADDRESS", default_value = ":8080")]
    pub listen_address: String,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Errors in startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IMMICH_URL is required")]
    MissingUrl,

    #[error("IMMICH_URL {url:?} is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("IMMICH_URL scheme must be http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("IMMICH_API_KEY is required")]
    MissingApiKey,

    #[error("LISTEN_ADDRESS {0:?} must be host:port or :port")]
    InvalidListenAddress(String),
}

/// Validated exporter configuration.
pub struct Config {
    pub immich_url: String,
    pub api_key: String,
    /// Bindable `host:port`.
    pub listen_address: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let immich_url = validate_url(&cli.immich_url)?;

        let api_key = cli.immich_api_key;
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let listen_address = normalize_listen_address(&cli.listen_address)?;

        Ok(Self {
            immich_url,
            api_key,
            listen_address,
            log_format: cli.log_format,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("immich_url", &self.immich_url)
            .field("api_key", &"<redacted>")
            .field("listen_address", &self.listen_address)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn validate_url(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::MissingUrl);
    }

    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Turn `:8080` into `0.0.0.0:8080` and check that a port is present.
fn normalize_listen_address(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let invalid = || ConfigError::InvalidListenAddress(raw.to_string());

    let (host, port) = raw.rsplit_once(':').ok_or_else(invalid)?;
    port.parse::<u16>().map_err(|_| invalid())?;

    if host.is_empty() {
        Ok(format!("0.0.0.0:{port}"))
    } else {
        Ok(raw.to_string())
    }
}
