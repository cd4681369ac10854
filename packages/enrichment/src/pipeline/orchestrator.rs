//! Generation orchestration - one logical request, quota-aware retry.

use tracing::{info, warn};

use crate::error::{EnrichError, Result};
use crate::traits::backend::{GenerationBackend, GenerationReply, GenerationRequest, Sleeper};
use crate::types::config::RetryPolicy;

/// Issue one logical generation request, retrying only the quota class.
///
/// The first attempt runs immediately; each retry sleeps the next
/// configured delay first. Any non-quota error propagates at once. When
/// the quota class outlasts the schedule, the call fails with
/// [`EnrichError::QuotaExhausted`].
pub async fn generate_with_retry<B: GenerationBackend, S: Sleeper>(
    backend: &B,
    request: &GenerationRequest,
    retry: &RetryPolicy,
    sleeper: &S,
) -> Result<GenerationReply> {
    let max_attempts = retry.max_retries() + 1;
    let mut attempt = 1;

    loop {
        match backend.generate(request).await {
            Ok(reply) => {
                if attempt > 1 {
                    info!(attempt, model = %request.model, "Generation succeeded after retry");
                }
                return Ok(reply);
            }
            Err(err) if err.is_rate_limited() && attempt < max_attempts => {
                let delay = retry.delays[attempt - 1];
                warn!(
                    attempt,
                    delay_secs = delay.as_secs(),
                    "Generation rate limited, backing off"
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
            Err(err) if err.is_rate_limited() => {
                warn!(attempts = attempt, "Generation quota exhausted, giving up");
                return Err(EnrichError::QuotaExhausted {
                    attempts: attempt,
                    source: err,
                });
            }
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, MockOutcome, RecordingSleeper};
    use std::time::Duration;

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "test-model".to_string(),
            system: "system".to_string(),
            prompt: "prompt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_never_sleeps() {
        let backend = MockBackend::new().with_reply("text");
        let sleeper = RecordingSleeper::new();

        let reply = generate_with_retry(&backend, &request(), &RetryPolicy::default(), &sleeper)
            .await
            .unwrap();

        assert_eq!(reply.text, "text");
        assert_eq!(backend.call_count(), 1);
        assert!(sleeper.slept().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limits_retried_with_schedule() {
        let backend = MockBackend::new().with_rate_limits(2).with_reply("recovered");
        let sleeper = RecordingSleeper::new();

        let reply = generate_with_retry(&backend, &request(), &RetryPolicy::default(), &sleeper)
            .await
            .unwrap();

        assert_eq!(reply.text, "recovered");
        assert_eq!(backend.call_count(), 3);
        assert_eq!(
            sleeper.slept(),
            vec![Duration::from_secs(2), Duration::from_secs(5)]
        );
    }

    #[tokio::test]
    async fn test_success_on_the_final_scheduled_attempt() {
        // Rate limited three times, recovered on the fourth and last try.
        let backend = MockBackend::new().with_rate_limits(3).with_reply("recovered");
        let sleeper = RecordingSleeper::new();

        let reply = generate_with_retry(&backend, &request(), &RetryPolicy::default(), &sleeper)
            .await
            .unwrap();

        assert_eq!(reply.text, "recovered");
        assert_eq!(backend.call_count(), 4);
        assert_eq!(
            sleeper.slept(),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(5),
                Duration::from_secs(15)
            ]
        );
    }

    #[tokio::test]
    async fn test_quota_exhaustion_after_full_schedule() {
        let backend = MockBackend::new().with_rate_limits(4);
        let sleeper = RecordingSleeper::new();

        let err = generate_with_retry(&backend, &request(), &RetryPolicy::default(), &sleeper)
            .await
            .unwrap_err();

        match err {
            EnrichError::QuotaExhausted { attempts, .. } => assert_eq!(attempts, 4),
            other => panic!("expected QuotaExhausted, got {other:?}"),
        }
        assert_eq!(backend.call_count(), 4);
        assert_eq!(
            sleeper.slept(),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(5),
                Duration::from_secs(15)
            ]
        );
    }

    #[tokio::test]
    async fn test_non_quota_errors_never_retried() {
        let backend =
            MockBackend::new().with_outcome(MockOutcome::ApiError("bad request".to_string()));
        let sleeper = RecordingSleeper::new();

        let err = generate_with_retry(&backend, &request(), &RetryPolicy::default(), &sleeper)
            .await
            .unwrap_err();

        assert!(matches!(err, EnrichError::Backend(_)));
        assert_eq!(backend.call_count(), 1);
        assert!(sleeper.slept().is_empty());
    }

    #[tokio::test]
    async fn test_no_retry_policy_fails_on_first_rate_limit() {
        let backend = MockBackend::new().with_rate_limits(1);
        let sleeper = RecordingSleeper::new();

        let err = generate_with_retry(&backend, &request(), &RetryPolicy::none(), &sleeper)
            .await
            .unwrap_err();

        assert!(matches!(err, EnrichError::QuotaExhausted { attempts: 1, .. }));
        assert!(sleeper.slept().is_empty());
    }
}
