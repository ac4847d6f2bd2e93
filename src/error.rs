//! Error types for Moverwatch.

use thiserror::Error;

/// The main error type for Moverwatch.
#[derive(Error, Debug)]
pub enum Error {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Non-2xx HTTP status from the quote provider.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Error or rate-limit message embedded in a provider response.
    #[error("{0}")]
    Provider(String),

    /// Response did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration errors (missing or placeholder API key, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Watchlist storage read/write failures
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Transient network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Invalid input or state
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new provider-signaled error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new persistence error.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the request client may retry after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }

    /// Check if this error is recoverable (user can retry).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}
