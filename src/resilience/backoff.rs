//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

use crate::config::RetryConfig;

/// Upper bound for any single backoff wait.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Jitter is drawn uniformly from `[0, JITTER_MS)`.
pub const JITTER_MS: u64 = 100;

/// Delay before retry number `retry_count + 1`, without jitter.
///
/// Exponential mode doubles from `base_ms` on each retry; linear mode always
/// waits `base_ms`. Both are capped at [`MAX_BACKOFF_MS`].
pub fn base_delay_ms(retry_count: u32, base_ms: u64, exponential: bool) -> u64 {
    let delay = if exponential {
        base_ms.saturating_mul(2u64.saturating_pow(retry_count))
    } else {
        base_ms
    };
    delay.min(MAX_BACKOFF_MS)
}

/// Calculate the wait before the next attempt.
pub fn calculate_backoff(retry_count: u32, config: &RetryConfig) -> Duration {
    if !config.use_exponential_backoff {
        return Duration::from_millis(base_delay_ms(retry_count, config.base_delay_ms, false));
    }

    let jitter = rand::thread_rng().gen_range(0..JITTER_MS);
    let delay_ms = base_delay_ms(retry_count, config.base_delay_ms, true)
        .saturating_add(jitter)
        .min(MAX_BACKOFF_MS);

    Duration::from_millis(delay_ms)
}
