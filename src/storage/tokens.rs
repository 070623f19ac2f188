//! Access/refresh token persistence.
//!
//! Storage failures never reach callers: reads degrade to "absent" and
//! writes are logged and dropped.

use std::sync::Arc;

use crate::storage::kv::{KeyValueStore, MemoryStore};

pub const ACCESS_TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Persists the bearer credentials used by the request client.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Token store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Persist both tokens, overwriting previous values. A `None` refresh
    /// token removes the stored one.
    pub fn store(&self, access_token: &str, refresh_token: Option<&str>) {
        self.write(ACCESS_TOKEN_KEY, Some(access_token));
        self.write(REFRESH_TOKEN_KEY, refresh_token);
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Remove both tokens. Idempotent.
    pub fn clear(&self) {
        self.write(ACCESS_TOKEN_KEY, None);
        self.write(REFRESH_TOKEN_KEY, None);
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Token storage unavailable, treating as absent");
                None
            }
        }
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        };
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "Failed to persist token");
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_access_token", &self.access_token().is_some())
            .field("has_refresh_token", &self.refresh_token().is_some())
            .finish()
    }
}
