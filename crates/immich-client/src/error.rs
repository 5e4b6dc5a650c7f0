//! Error types for the upstream client.

use thiserror::Error;

/// Result type alias for upstream client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the Immich API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("api key is not a valid header value")]
    InvalidApiKey,

    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status code {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Short machine-friendly name for the failure class, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::InvalidApiKey | ClientError::Build(_) => "config",
            ClientError::Transport { .. } => "transport",
            ClientError::HttpStatus { .. } => "http_status",
            ClientError::Decode { .. } => "decode",
        }
    }
}
