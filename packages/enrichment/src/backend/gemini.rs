//! Gemini-backed [`GenerationBackend`].
//!
//! Thin adapter over `gemini-client`: every request goes out with the
//! Google Search grounding tool attached, since the whole point of the
//! pipeline is verification against live sources. Error mapping keeps
//! the rate-limit class intact so the retry loop can recognize it.

use async_trait::async_trait;
use gemini_client::{GeminiClient, GeminiError, GenerateContentRequest};

use crate::error::{BackendError, BackendResult};
use crate::traits::backend::{GenerationBackend, GenerationReply, GenerationRequest};

/// Generation backend talking to the Gemini API with search grounding.
pub struct GeminiBackend {
    client: GeminiClient,
}

impl GeminiBackend {
    /// Wrap an existing client.
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Build from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> BackendResult<Self> {
        let client = GeminiClient::from_env().map_err(map_error)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> BackendResult<GenerationReply> {
        let api_request =
            GenerateContentRequest::grounded(request.system.as_str(), request.prompt.as_str());

        let response = self
            .client
            .generate_content(&request.model, api_request)
            .await
            .map_err(map_error)?;

        let text = response.text().ok_or(BackendError::EmptyResponse)?;
        // Prefer the exact serving version when the API reports one.
        let model = response
            .model_version
            .unwrap_or_else(|| request.model.clone());

        Ok(GenerationReply { text, model })
    }
}

fn map_error(err: GeminiError) -> BackendError {
    match err {
        GeminiError::Config(message) => BackendError::MissingCredential(message),
        GeminiError::RateLimited(message) => BackendError::RateLimited(message),
        GeminiError::Network(message) => BackendError::Network(message),
        GeminiError::Api(message) | GeminiError::Parse(message) => BackendError::Api(message),
    }
}
