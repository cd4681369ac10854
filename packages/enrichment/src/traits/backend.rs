//! Generation backend trait - abstraction over grounded text generators.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::BackendResult;

/// One outgoing generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Backend model identifier (e.g. [`GEMINI_FLASH`](crate::GEMINI_FLASH))
    pub model: String,
    /// System framing: persona plus the output contract
    pub system: String,
    /// Full user prompt (locale facts, style directives, draft claims)
    pub prompt: String,
}

/// Raw output of one generation call.
#[derive(Debug, Clone)]
pub struct GenerationReply {
    /// Raw text: prose plus, when the backend cooperated, the machine block
    pub text: String,
    /// Identifier of the model that actually produced the text
    pub model: String,
}

/// A grounded text-generation backend.
///
/// Implementations wrap a specific provider and are expected to verify
/// claims against live sources when the prompt asks for it. One call is
/// one request: the retry schedule lives in the orchestrator, not here.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> BackendResult<GenerationReply>;
}

/// Sleep abstraction so retry schedules are testable without real delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
