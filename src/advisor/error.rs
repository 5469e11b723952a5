//! Error types for the advisory service.

use thiserror::Error;

/// Errors from a text-generation call.
///
/// [`Advisor`](super::Advisor) never returns these to its caller; it renders
/// them as an inline `Error: ...` string instead.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// The service answered `429 Too Many Requests`. Retried with backoff.
    #[error("API rate limit reached")]
    RateLimited,

    /// The service answered with a non-success status.
    #[error("API returned status {0}")]
    Status(u16),

    /// The request could not be sent or the connection failed.
    #[error("Failed to connect to AI service. {0}")]
    Connection(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("Malformed API response: {0}")]
    Decode(String),

    /// The response held no generated text.
    #[error("API response contained no text")]
    EmptyResponse,

    /// The retry policy allowed no attempts.
    #[error("API call failed after multiple retries.")]
    RetriesExhausted,
}

/// Errors loading the advisory service configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
