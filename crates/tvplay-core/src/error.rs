//! Error types for tvplay.

use thiserror::Error;

/// Result type alias using tvplay's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tvplay.
#[derive(Error, Debug)]
pub enum Error {
    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Network error: {0}")]
    Network(String),

    // Resolution errors
    #[error("Resolution failed: {0}")]
    Resolution(String),

    // Engine errors
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Engine construction failed: {0}")]
    EngineConstruction(String),

    #[error("No engine attached")]
    NoEngine,

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    // Preference storage errors
    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Database error: {0}")]
    Database(String),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP-specific errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed with status {status}: {message}")]
    StatusError { status: u16, message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Returns true if this error is retryable.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Resolution(_)
                | Self::Http(HttpError::ConnectionFailed(_) | HttpError::Timeout)
        )
    }

    /// Returns true if the error means there is no usable engine handle.
    pub const fn is_detached(&self) -> bool {
        matches!(self, Self::NoEngine)
    }
}
