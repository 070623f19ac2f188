//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! api::* call
//!     → client.rs (attach bearer, wrap in retry policy)
//!     → request.rs (method, path, JSON body, request ID)
//!     → transport.rs (reqwest, base URL, timeouts)
//!     → response.rs (status + body)
//!     → 401: refresh once and re-issue, else end the session
//!     → non-2xx: classify into ClassifiedError
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{RequestClient, RequestOptions};
pub use request::{ApiRequest, REQUEST_ID_HEADER};
pub use response::ApiResponse;
pub use transport::{ReqwestTransport, Transport};
