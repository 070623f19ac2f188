//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap every transport call with a deadline
//! - Report an expired deadline as "no response"
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - A timeout classifies as NETWORK; there is no separate cancelled kind

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::errors::RawError;

/// Run `fut` with a deadline, mapping expiry to [`RawError::NoResponse`].
pub async fn with_timeout<T, F>(duration: Duration, fut: F) -> Result<T, RawError>
where
    F: Future<Output = Result<T, RawError>>,
{
    match timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = duration.as_millis() as u64, "Request timed out");
            Err(RawError::no_response(format!(
                "timeout of {}ms exceeded",
                duration.as_millis()
            )))
        }
    }
}
