//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required argument is empty or otherwise unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The server URL cannot be used for a WebSocket connection
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
