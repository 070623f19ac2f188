//! Outgoing request representation.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::RawError;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request to the budgeting API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with '/', e.g. `/budget/3`.
    pub path: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    /// Correlation id, also sent as `x-request-id`.
    pub request_id: String,
    /// Set once this request has been re-issued after a token refresh.
    pub retried: bool,
    /// Leave 401 responses alone (login, register, refresh).
    pub skip_auth_refresh: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            request_id: Uuid::new_v4().to_string(),
            retried: false,
            skip_auth_refresh: false,
        }
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn skip_auth_refresh(mut self, skip: bool) -> Self {
        self.skip_auth_refresh = skip;
        self
    }

    /// Set `Authorization: Bearer <token>`, replacing any previous value.
    pub fn set_bearer(&mut self, token: &str) -> Result<(), RawError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| RawError::other("access token contains invalid header characters"))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}
