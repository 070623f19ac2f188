//! Budget endpoints.

use std::time::Duration;

use serde::de::IgnoredAny;

use crate::api::models::{Budget, BudgetInput};
use crate::config::schema::ApiConfig;
use crate::errors::{ApiResult, ErrorKind};
use crate::http::{RequestClient, Transport};

const BASE: &str = "/budget";

pub struct BudgetsApi<'a, T> {
    client: &'a RequestClient<T>,
    config: &'a ApiConfig,
}

impl<'a, T: Transport> BudgetsApi<'a, T> {
    pub fn new(client: &'a RequestClient<T>, config: &'a ApiConfig) -> Self {
        Self { client, config }
    }

    pub async fn list(&self) -> ApiResult<Vec<Budget>> {
        self.client.get(BASE).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Budget> {
        self.client.get(&path(id)).await
    }

    /// Read a budget that may not be visible yet, e.g. right after creation.
    ///
    /// NOT_FOUND is retried `not_found_retries` times, `not_found_delay_ms`
    /// apart. Every other failure returns immediately.
    pub async fn get_eventually(&self, id: i64) -> ApiResult<Budget> {
        let delay = Duration::from_millis(self.config.not_found_delay_ms);
        let mut attempt = 0;

        loop {
            match self.get(id).await {
                Err(e)
                    if e.kind() == ErrorKind::NotFound
                        && attempt < self.config.not_found_retries =>
                {
                    attempt += 1;
                    tracing::debug!(budget_id = id, attempt, "Budget not visible yet");
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    pub async fn create(&self, input: &BudgetInput) -> ApiResult<Budget> {
        self.client.post(BASE, input).await
    }

    pub async fn update(&self, id: i64, input: &BudgetInput) -> ApiResult<Budget> {
        self.client.put(&path(id), input).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let _: IgnoredAny = self.client.delete(&path(id)).await?;
        Ok(())
    }
}

fn path(id: i64) -> String {
    format!("{}/{}", BASE, id)
}
