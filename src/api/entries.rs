//! Entry endpoints.

use serde::de::IgnoredAny;

use crate::api::models::{Category, Entry, EntryInput};
use crate::errors::{ApiResult, ClassifiedError};
use crate::http::{RequestClient, Transport};

const BASE: &str = "/entries";

pub struct EntriesApi<'a, T> {
    client: &'a RequestClient<T>,
}

impl<'a, T: Transport> EntriesApi<'a, T> {
    pub fn new(client: &'a RequestClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Entry>> {
        self.client.get(BASE).await
    }

    pub async fn for_budget(&self, budget_id: i64) -> ApiResult<Vec<Entry>> {
        let mut entries = self.list().await?;
        entries.retain(|e| e.budget_id == budget_id);
        Ok(entries)
    }

    pub async fn get(&self, id: i64) -> ApiResult<Entry> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    pub async fn create(&self, input: &EntryInput) -> ApiResult<Entry> {
        self.client.post(BASE, input).await
    }

    /// Create an entry after checking it fits `category`.
    ///
    /// Fails with BUSINESS, without sending anything, when the entry's type
    /// or ids disagree with the category.
    pub async fn create_in_category(
        &self,
        category: &Category,
        input: &EntryInput,
    ) -> ApiResult<Entry> {
        check_category(category, input)?;
        self.create(input).await
    }

    pub async fn update(&self, id: i64, input: &EntryInput) -> ApiResult<Entry> {
        self.client.put(&format!("{}/{}", BASE, id), input).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let _: IgnoredAny = self.client.delete(&format!("{}/{}", BASE, id)).await?;
        Ok(())
    }
}

fn check_category(category: &Category, input: &EntryInput) -> Result<(), ClassifiedError> {
    if input.category_id != category.id || input.budget_id != category.budget_id {
        return Err(ClassifiedError::business(format!(
            "Entry does not belong to category '{}'",
            category.name
        )));
    }
    if input.entry_type != category.category_type {
        return Err(ClassifiedError::business(format!(
            "Category '{}' only accepts {} entries, got {}",
            category.name, category.category_type, input.entry_type
        )));
    }
    Ok(())
}
