//! Pure Gemini REST API client
//!
//! A clean, minimal client for the Google Gemini API with no domain-specific
//! logic. Supports text generation with optional Google Search grounding.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{Content, GeminiClient, GenerateContentRequest, Tool};
//!
//! let client = GeminiClient::from_env()?;
//!
//! let response = client.generate_content("gemini-2.5-flash", GenerateContentRequest {
//!     contents: vec![Content::user("What opened in Minneapolis this week?")],
//!     tools: vec![Tool::google_search()],
//!     ..Default::default()
//! }).await?;
//!
//! println!("{}", response.text().unwrap_or_default());
//! ```

pub mod error;
pub mod types;

pub use error::{GeminiError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    /// Create from environment variable `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::Config("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies, regional endpoints, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate content.
    ///
    /// Sends a request to `models/{model}:generateContent`. A 429 status or
    /// a RESOURCE_EXHAUSTED error body maps to [`GeminiError::RateLimited`]
    /// so callers can retry that class separately.
    pub async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let api_error = parse_api_error(&error_text);
            let message = api_error
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or(error_text);
            warn!(status = %status, error = %message, "Gemini API error");

            let quota = status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || api_error
                    .as_ref()
                    .is_some_and(|e| e.status == "RESOURCE_EXHAUSTED");
            if quota {
                return Err(GeminiError::RateLimited(message));
            }
            return Err(GeminiError::Api(format!(
                "Gemini API error {}: {}",
                status, message
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        debug!(
            model = %model,
            duration_ms = start.elapsed().as_millis(),
            candidates = parsed.candidates.len(),
            "Gemini generate_content"
        );

        Ok(parsed)
    }

    /// Single-prompt generation with Google Search grounding.
    ///
    /// Convenience wrapper returning the joined text of the first candidate.
    pub async fn generate_grounded(
        &self,
        model: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String> {
        let response = self
            .generate_content(model, GenerateContentRequest::grounded(system, prompt))
            .await?;
        response
            .text()
            .ok_or_else(|| GeminiError::Api("No candidates in Gemini response".into()))
    }
}

fn parse_api_error(body: &str) -> Option<types::ApiErrorBody> {
    serde_json::from_str::<types::ApiErrorResponse>(body)
        .ok()
        .map(|r| r.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("test-key").with_base_url("https://custom.api.com");

        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, "https://custom.api.com");
    }

    #[test]
    fn test_parse_api_error_body() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let parsed = parse_api_error(body).unwrap();

        assert_eq!(parsed.code, 429);
        assert_eq!(parsed.message, "Quota exceeded");
        assert_eq!(parsed.status, "RESOURCE_EXHAUSTED");
        assert!(parse_api_error("not json").is_none());
    }

    #[test]
    fn test_rate_limited_classification() {
        let err = GeminiError::RateLimited("quota".into());
        assert!(err.is_rate_limited());

        let err = GeminiError::Api("bad request".into());
        assert!(!err.is_rate_limited());
    }
}
