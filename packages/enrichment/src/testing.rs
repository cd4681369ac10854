//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that drive the enrichment
//! pipeline without making real generation calls or waiting out real
//! retry delays.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use crate::error::{BackendError, BackendResult};
use crate::traits::backend::{GenerationBackend, GenerationReply, GenerationRequest, Sleeper};

/// Scripted outcome for one mock generation call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Succeed with this raw text
    Reply(String),
    /// Fail with the quota/rate-limit class
    RateLimited,
    /// Fail with a non-retryable API error
    ApiError(String),
}

/// A mock generation backend with scripted outcomes and call tracking.
///
/// Outcomes are consumed in order; once the script is down to its last
/// entry, that entry repeats. With no script at all, every call succeeds
/// with a minimal prose reply. Clones share their script and call log.
#[derive(Clone, Default)]
pub struct MockBackend {
    script: Arc<Mutex<Vec<MockOutcome>>>,
    calls: Arc<RwLock<Vec<MockCall>>>,
}

/// Record of a call made to the mock backend.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub model: String,
    pub system: String,
    pub prompt: String,
}

impl MockBackend {
    /// Create a new mock backend with default behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome.
    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.script.lock().unwrap().push(outcome);
        self
    }

    /// Queue a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_outcome(MockOutcome::Reply(text.into()))
    }

    /// Queue `n` rate-limit failures.
    pub fn with_rate_limits(mut self, n: usize) -> Self {
        for _ in 0..n {
            self = self.with_outcome(MockOutcome::RateLimited);
        }
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, request: &GenerationRequest) -> BackendResult<GenerationReply> {
        self.calls.write().unwrap().push(MockCall {
            model: request.model.clone(),
            system: request.system.clone(),
            prompt: request.prompt.clone(),
        });

        let outcome = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                MockOutcome::Reply("Nothing verified today.".to_string())
            } else if script.len() == 1 {
                script[0].clone()
            } else {
                script.remove(0)
            }
        };

        match outcome {
            MockOutcome::Reply(text) => Ok(GenerationReply {
                text,
                model: request.model.clone(),
            }),
            MockOutcome::RateLimited => {
                Err(BackendError::RateLimited("mock quota exhausted".to_string()))
            }
            MockOutcome::ApiError(message) => Err(BackendError::Api(message)),
        }
    }
}

/// A sleeper that records requested durations instead of waiting.
///
/// Clones share their log, so a test can keep a handle while the
/// pipeline owns another.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order.
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    /// Total requested sleep time.
    pub fn total_slept(&self) -> Duration {
        self.slept.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}
