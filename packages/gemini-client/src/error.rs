//! Error types for the Gemini client.

use thiserror::Error;

/// Result type for Gemini client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Gemini client errors.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Configuration error (missing API key, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Quota or rate-limit rejection (HTTP 429 / RESOURCE_EXHAUSTED)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// API error from Gemini
    #[error("API error: {0}")]
    Api(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GeminiError {
    /// Whether this error is in the quota/rate-limit class.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GeminiError::RateLimited(_))
    }
}
