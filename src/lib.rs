//! Client library for the personal budgeting REST API.

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod resilience;
pub mod session;
pub mod storage;

pub use api::BudgetApi;
pub use config::ClientConfig;
pub use errors::{ApiResult, ClassifiedError, ErrorKind};
pub use http::{RequestClient, RequestOptions};
pub use resilience::RetryPolicy;
pub use session::SessionController;
pub use storage::TokenStore;
