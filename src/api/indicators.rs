//! Financial indicator endpoint.
//!
//! A budget with no entries has no indicators yet; the API answers 404.
//! [`IndicatorsApi::fetch_or_default`] maps exactly that case to zeroed
//! indicators. Anything else is an error the caller sees.

use crate::api::models::FinancialIndicators;
use crate::errors::{ApiResult, ErrorKind};
use crate::http::{RequestClient, Transport};

pub struct IndicatorsApi<'a, T> {
    client: &'a RequestClient<T>,
}

impl<'a, T: Transport> IndicatorsApi<'a, T> {
    pub fn new(client: &'a RequestClient<T>) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, budget_id: i64) -> ApiResult<FinancialIndicators> {
        self.client
            .get(&format!("/financial-indicators/{}", budget_id))
            .await
    }

    /// Like [`fetch`](Self::fetch), with NOT_FOUND read as "nothing yet".
    pub async fn fetch_or_default(&self, budget_id: i64) -> ApiResult<FinancialIndicators> {
        match self.fetch(budget_id).await {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(budget_id, "No indicators yet, using defaults");
                Ok(FinancialIndicators::default())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api::models::FinancialIndicators;
    use crate::api::testing::{api, json};
    use crate::errors::ErrorKind;

    #[tokio::test]
    async fn test_fetch() {
        let api = api(|req| {
            assert_eq!(req.path, "/financial-indicators/3");
            json(200, json!({"debtToIncome": 0.31, "savingsRate": 0.12, "score": 64}))
        });
        let indicators = api.indicators().fetch(3).await.unwrap();
        assert_eq!(indicators.debt_to_income, 0.31);
        assert_eq!(indicators.score, 64.0);
    }

    #[tokio::test]
    async fn test_not_found_falls_back_to_default() {
        let api = api(|_| json(404, json!({"message": "No indicators"})));
        assert!(api.indicators().fetch(3).await.is_err());
        let indicators = api.indicators().fetch_or_default(3).await.unwrap();
        assert_eq!(indicators, FinancialIndicators::default());
    }

    #[tokio::test]
    async fn test_other_failures_propagate() {
        let api = api(|_| json(500, json!({"message": "Database unavailable"})));
        let err = api.indicators().fetch_or_default(3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.message(), "Database unavailable");
    }
}
