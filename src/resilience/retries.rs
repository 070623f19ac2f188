//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a classified failure is worth another attempt
//! - Execute retries with exponential backoff + jitter
//! - Enforce the per-request retry budget (`max_retries`)
//!
//! # State Transitions
//! ```text
//! Attempting → Succeeded: attempt returned Ok
//! Attempting → Waiting:   transient failure, budget left
//! Attempting → Failed:    permanent failure or budget spent
//! Waiting → Attempting:   backoff elapsed, retry_count += 1
//! ```
//!
//! # Design Decisions
//! - Eligibility is gated by kind first, status code second
//! - Attempts are strictly sequential; the next one starts only after the
//!   previous one has been classified

use std::future::Future;

use crate::config::RetryConfig;
use crate::errors::{ClassifiedError, ErrorKind};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Statuses that are transient by protocol definition even though they
/// classify as UNKNOWN for display.
const TRANSIENT_UNKNOWN_STATUSES: [u16; 2] = [408, 429];

/// Where a request currently is in its retry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting,
    Waiting,
    Succeeded,
    Failed,
}

/// Whether a failure may be retried under `config`, ignoring the budget.
pub fn is_retryable(error: &ClassifiedError, config: &RetryConfig) -> bool {
    let kind = error.kind();
    if kind == ErrorKind::Network {
        return true;
    }
    if kind.is_permanent() {
        return false;
    }
    match error.status_code() {
        Some(status) if config.retryable_status_codes.contains(&status) => {
            kind == ErrorKind::Server || TRANSIENT_UNKNOWN_STATUSES.contains(&status)
        }
        _ => false,
    }
}

/// Retry decorator for any async request producer.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `produce` until it succeeds, fails permanently or the budget is
    /// spent.
    pub async fn execute<T, E, F, Fut>(&self, produce: F) -> Result<T, ClassifiedError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<ClassifiedError>,
    {
        execute_with_retry(produce, &self.config).await
    }
}

/// Run `produce`, retrying transient failures per `config`.
///
/// `max_retries = 0` performs exactly one attempt. The final failure is
/// always returned, never swallowed.
pub async fn execute_with_retry<T, E, F, Fut>(
    mut produce: F,
    config: &RetryConfig,
) -> Result<T, ClassifiedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<ClassifiedError>,
{
    let mut retry_count: u32 = 0;
    let mut state = RetryState::Attempting;

    loop {
        tracing::trace!(?state, retry_count, "Retry state");
        match produce().await {
            Ok(value) => {
                state = RetryState::Succeeded;
                if retry_count > 0 {
                    tracing::debug!(?state, retry_count, "Request succeeded after retries");
                }
                return Ok(value);
            }
            Err(e) => {
                let error: ClassifiedError = e.into();

                if retry_count >= config.max_retries || !is_retryable(&error, config) {
                    state = RetryState::Failed;
                    tracing::debug!(
                        ?state,
                        retry_count,
                        kind = %error.kind(),
                        status = ?error.status_code(),
                        "Giving up on request"
                    );
                    return Err(error);
                }

                state = RetryState::Waiting;
                let backoff = calculate_backoff(retry_count, config);
                tracing::info!(
                    ?state,
                    attempt = retry_count + 1,
                    delay = ?backoff,
                    kind = %error.kind(),
                    status = ?error.status_code(),
                    "Retrying request"
                );
                metrics::record_retry(error.kind());
                tokio::time::sleep(backoff).await;

                retry_count += 1;
                state = RetryState::Attempting;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use crate::errors::RawError;

    fn config(max_retries: u32, codes: &[u16]) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1000,
            retryable_status_codes: codes.iter().copied().collect(),
            use_exponential_backoff: true,
        }
    }

    /// Producer failing with `raw` for the first `failures` calls.
    fn failing(
        calls: Arc<AtomicU32>,
        failures: u32,
        raw: RawError,
    ) -> impl FnMut() -> std::future::Ready<Result<&'static str, RawError>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < failures {
                std::future::ready(Err(raw.clone()))
            } else {
                std::future::ready(Ok("ok"))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_three_503s() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = execute_with_retry(
            failing(calls.clone(), 3, RawError::status(503, "")),
            &config(3, &[503]),
        )
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_is_respected() {
        for max_retries in [0, 1, 2, 5] {
            let calls = Arc::new(AtomicU32::new(0));
            let err = execute_with_retry(
                failing(calls.clone(), u32::MAX, RawError::no_response("offline")),
                &config(max_retries, &[]),
            )
            .await
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Network);
            assert_eq!(calls.load(Ordering::SeqCst), max_retries + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_short_circuits() {
        let calls = Arc::new(AtomicU32::new(0));
        let err = execute_with_retry(
            failing(calls.clone(), u32::MAX, RawError::status(400, "")),
            &config(2, &[400, 500]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_permanent_kinds_ignore_misconfigured_codes() {
        let cfg = config(3, &[400, 401, 403, 404, 409]);
        for status in [400, 401, 403, 404, 409] {
            let err: ClassifiedError = RawError::status(status, "").into();
            assert!(!is_retryable(&err, &cfg), "status {} retried", status);
        }
        assert!(!is_retryable(&ClassifiedError::business("no"), &cfg));
    }

    #[test]
    fn test_transient_statuses() {
        let cfg = RetryConfig::default();
        for status in [408, 429, 500, 502, 503, 504] {
            let err: ClassifiedError = RawError::status(status, "").into();
            assert!(is_retryable(&err, &cfg), "status {} not retried", status);
        }
        let not_listed: ClassifiedError = RawError::status(503, "").into();
        assert!(!is_retryable(&not_listed, &config(3, &[500])));

        let unknown: ClassifiedError = RawError::other("decode failed").into();
        assert!(!is_retryable(&unknown, &cfg));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_between_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();
        let _ = execute_with_retry(
            failing(calls.clone(), 2, RawError::status(502, "")),
            &config(3, &[502]),
        )
        .await
        .unwrap();
        // 1000 + 2000 ms of backoff plus jitter below 100 ms each.
        let waited = started.elapsed().as_millis();
        assert!((3000..3200).contains(&waited), "waited {}ms", waited);
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_wrapper_uses_its_config() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(RetryConfig::disabled());
        let err = policy
            .execute(failing(calls.clone(), u32::MAX, RawError::status(503, "")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
