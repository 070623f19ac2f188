//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to the budgeting API:
//!     → timeouts.rs (every transport call has a deadline)
//!     → On failure: classify, then retries.rs (check if retryable, retry with backoff)
//!     → backoff.rs (capped exponential delay with jitter, or flat delay)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries are transport-agnostic: any `FnMut() -> Future<Result>` can be wrapped
//! - Only NETWORK failures and listed transient statuses are retried

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::{execute_with_retry, is_retryable, RetryPolicy, RetryState};
pub use timeouts::with_timeout;
