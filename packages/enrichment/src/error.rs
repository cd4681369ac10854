//! Error types for the enrichment library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can surface from an enrichment call.
///
/// Only configuration problems and generation failures are errors. A
/// missing or malformed machine-readable payload is not: extraction
/// degrades the document instead (see [`crate::pipeline::extract`]).
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Configuration error (empty model identifier, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend stayed rate limited through the whole retry schedule
    #[error("Generation quota exhausted after {attempts} attempts")]
    QuotaExhausted {
        attempts: usize,
        #[source]
        source: BackendError,
    },

    /// Non-retryable generation backend failure
    #[error("Generation backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Errors produced by a [`GenerationBackend`](crate::traits::GenerationBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// No credential configured; fails immediately, never retried
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Quota or rate-limit rejection; the only retryable class
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Upstream API rejected the request
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The backend returned no usable text
    #[error("Empty response from backend")]
    EmptyResponse,
}

impl BackendError {
    /// Whether this error is in the quota/rate-limit class.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, BackendError::RateLimited(_))
    }
}

/// Result type alias for enrichment operations.
pub type Result<T> = std::result::Result<T, EnrichError>;

/// Result type alias for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;
