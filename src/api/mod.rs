//! Typed surface over the budgeting REST API.
//!
//! # Data Flow
//! ```text
//! caller (CLI, embedding application)
//!     → BudgetApi::{auth, budgets, categories, entries, indicators}
//!     → RequestClient (bearer, 401 recovery, retries)
//!     → models.rs (camelCase JSON ↔ Rust types)
//! ```
//!
//! # Design Decisions
//! - Endpoint groups borrow the shared client; they hold no state of their own
//! - Client-side domain rules (entry/category type) fail as BUSINESS before
//!   any request is sent

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod entries;
pub mod indicators;
pub mod models;

use crate::config::schema::ApiConfig;
use crate::http::{ReqwestTransport, RequestClient, Transport};

pub use auth::AuthApi;
pub use budgets::BudgetsApi;
pub use categories::CategoriesApi;
pub use entries::EntriesApi;
pub use indicators::IndicatorsApi;

/// Entry point bundling the request client with endpoint settings.
#[derive(Debug)]
pub struct BudgetApi<T = ReqwestTransport> {
    client: RequestClient<T>,
    config: ApiConfig,
}

impl<T: Transport> BudgetApi<T> {
    pub fn new(client: RequestClient<T>, config: ApiConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &RequestClient<T> {
        &self.client
    }

    pub fn auth(&self) -> AuthApi<'_, T> {
        AuthApi::new(&self.client, &self.config)
    }

    pub fn budgets(&self) -> BudgetsApi<'_, T> {
        BudgetsApi::new(&self.client, &self.config)
    }

    pub fn categories(&self) -> CategoriesApi<'_, T> {
        CategoriesApi::new(&self.client)
    }

    pub fn entries(&self) -> EntriesApi<'_, T> {
        EntriesApi::new(&self.client)
    }

    pub fn indicators(&self) -> IndicatorsApi<'_, T> {
        IndicatorsApi::new(&self.client)
    }
}
