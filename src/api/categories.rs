//! Category endpoints.

use serde::de::IgnoredAny;

use crate::api::models::{Category, CategoryInput};
use crate::errors::ApiResult;
use crate::http::{RequestClient, Transport};

const BASE: &str = "/categories";

pub struct CategoriesApi<'a, T> {
    client: &'a RequestClient<T>,
}

impl<'a, T: Transport> CategoriesApi<'a, T> {
    pub fn new(client: &'a RequestClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        self.client.get(BASE).await
    }

    /// Categories belonging to one budget.
    pub async fn for_budget(&self, budget_id: i64) -> ApiResult<Vec<Category>> {
        let mut categories = self.list().await?;
        categories.retain(|c| c.budget_id == budget_id);
        Ok(categories)
    }

    pub async fn get(&self, id: i64) -> ApiResult<Category> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    pub async fn create(&self, input: &CategoryInput) -> ApiResult<Category> {
        self.client.post(BASE, input).await
    }

    pub async fn update(&self, id: i64, input: &CategoryInput) -> ApiResult<Category> {
        self.client.put(&format!("{}/{}", BASE, id), input).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let _: IgnoredAny = self.client.delete(&format!("{}/{}", BASE, id)).await?;
        Ok(())
    }
}
