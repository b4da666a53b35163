/// Error types for the record store
use thiserror::Error;

/// Transport-level failures talking to the content store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exhausted for the configured token
    #[error("GitHub API rate limit exceeded. Resets at {reset_time}")]
    RateLimitExceeded {
        /// Time when the rate limit resets (ISO 8601 format)
        reset_time: String,
    },

    /// The supplied token no longer matches the stored file
    #[error("Write rejected as stale (HTTP {status}): {body}")]
    Conflict { status: u16, body: String },

    /// Any other non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A success status with a body we could not understand
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Failures turning stored bytes into records or back
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("content is not a JSON array of user records: {0}")]
    Json(#[from] serde_json::Error),
}
