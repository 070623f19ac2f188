//! Error classification subsystem.
//!
//! # Data Flow
//! ```text
//! transport failure (no response / status + body / other)
//!     → payload.rs (decode `{message, errors, code}` once)
//!     → classify.rs (status table, message choice, field errors)
//!     → ClassifiedError (kind, message, status, field errors, code)
//!     → retries.rs decides retry eligibility from the kind
//!     → caller renders title + message or per-field messages
//! ```

pub mod classify;
pub mod kind;
pub mod payload;

pub use classify::{classify, ClassifiedError, RawError};
pub use kind::ErrorKind;

/// Result type for everything that talks to the budgeting API.
pub type ApiResult<T> = Result<T, ClassifiedError>;
