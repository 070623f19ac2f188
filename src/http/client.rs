//! Authenticated, retrying request client.
//!
//! # Responsibilities
//! - Attach `Authorization: Bearer` from the token store to every request
//! - Recover one expired session per request via the refresh endpoint,
//!   across every retry attempt of that request
//! - End the session (clear tokens, redirect once) when recovery fails
//! - Wrap every verb in the retry policy
//!
//! # Design Decisions
//! - The refresh call goes straight to the transport, never through retries
//! - Concurrent 401s are not deduplicated; each request refreshes on its own
//!   and the session controller keeps the redirect to one

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::models::AuthTokens;
use crate::config::{ClientConfig, RetryConfig};
use crate::errors::{classify, ApiResult, ClassifiedError, RawError};
use crate::http::request::ApiRequest;
use crate::http::response::ApiResponse;
use crate::http::transport::{ReqwestTransport, Transport};
use crate::observability::metrics;
use crate::resilience::{execute_with_retry, with_timeout};
use crate::session::SessionController;
use crate::storage::TokenStore;

const UNAUTHORIZED: u16 = 401;

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Retry configuration for this call instead of the client's.
    pub retry: Option<RetryConfig>,
    /// Do not attempt a token refresh on 401.
    pub skip_auth_refresh: bool,
}

impl RequestOptions {
    pub fn without_auth_refresh() -> Self {
        Self {
            skip_auth_refresh: true,
            ..Self::default()
        }
    }
}

/// Client for the budgeting API.
pub struct RequestClient<T = ReqwestTransport> {
    transport: T,
    tokens: TokenStore,
    session: Arc<SessionController>,
    retry: RetryConfig,
    timeout: Duration,
    refresh_path: String,
}

impl RequestClient<ReqwestTransport> {
    /// Build a reqwest-backed client from configuration.
    pub fn from_config(
        config: &ClientConfig,
        tokens: TokenStore,
        session: Arc<SessionController>,
    ) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(transport, tokens, session)
            .with_retry_config(config.retries.clone())
            .with_timeout(Duration::from_secs(config.timeouts.request_secs))
            .with_refresh_path(config.api.refresh_path.clone()))
    }
}

impl<T: Transport> RequestClient<T> {
    pub fn new(transport: T, tokens: TokenStore, session: Arc<SessionController>) -> Self {
        Self {
            transport,
            tokens,
            session,
            retry: RetryConfig::default(),
            timeout: Duration::from_secs(30),
            refresh_path: "/auth/refresh-token".to_string(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn session(&self) -> &Arc<SessionController> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.request(Method::GET, path, None, &RequestOptions::default())
            .await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = to_value(body)?;
        self.request(Method::POST, path, Some(body), &RequestOptions::default())
            .await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = to_value(body)?;
        self.request(Method::PUT, path, Some(body), &RequestOptions::default())
            .await
    }

    pub async fn patch<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = to_value(body)?;
        self.request(Method::PATCH, path, Some(body), &RequestOptions::default())
            .await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.request(Method::DELETE, path, None, &RequestOptions::default())
            .await
    }

    /// Issue a request with retries and 401 recovery, decoding the body.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> ApiResult<R> {
        let retry = options.retry.as_ref().unwrap_or(&self.retry);
        let body = body.as_ref();
        let method = &method;
        let refreshed = AtomicBool::new(false);

        let response = execute_with_retry(
            || {
                self.send_with_auth(
                    method.clone(),
                    path,
                    body,
                    options.skip_auth_refresh,
                    &refreshed,
                )
            },
            retry,
        )
        .await?;

        Ok(response.json()?)
    }

    /// One attempt: authorize, send, and recover a 401 unless `refreshed`
    /// shows an earlier attempt of the same request already refreshed.
    async fn send_with_auth(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        skip_auth_refresh: bool,
        refreshed: &AtomicBool,
    ) -> ApiResult<ApiResponse> {
        let mut request = ApiRequest::new(method, path)
            .with_body(body.cloned())
            .skip_auth_refresh(skip_auth_refresh);
        if let Some(token) = self.tokens.access_token() {
            request.set_bearer(&token)?;
        }

        loop {
            let response = self.dispatch(&request).await?;
            if response.status != UNAUTHORIZED || request.skip_auth_refresh {
                return Ok(response.into_result()?);
            }

            if refreshed.swap(true, Ordering::AcqRel) {
                tracing::warn!(
                    request_id = %request.request_id,
                    path = %request.path,
                    "Request rejected again after token refresh"
                );
                return Err(self.end_session(response));
            }
            request.retried = true;

            match self.refresh_access_token().await {
                Ok(token) => request.set_bearer(&token)?,
                Err(e) => {
                    tracing::warn!(
                        request_id = %request.request_id,
                        error = %e,
                        "Token refresh failed"
                    );
                    return Err(self.end_session(response));
                }
            }
        }
    }

    /// Send once with the per-call deadline.
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, RawError> {
        tracing::debug!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            retried = request.retried,
            "Sending request"
        );

        let result = with_timeout(self.timeout, self.transport.send(request)).await;

        let status = result.as_ref().ok().map(|r| r.status);
        metrics::record_request(request.method.as_str(), status);
        match &result {
            Ok(response) => tracing::debug!(
                request_id = %request.request_id,
                status = response.status,
                "Received response"
            ),
            Err(e) => tracing::debug!(
                request_id = %request.request_id,
                error = %e,
                "Request failed"
            ),
        }
        result
    }

    /// Exchange the refresh token for a new access token and persist it.
    async fn refresh_access_token(&self) -> ApiResult<String> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or_else(|| ClassifiedError::authentication("No refresh token available"))?;

        let request = ApiRequest::new(Method::POST, self.refresh_path.as_str())
            .with_body(Some(json!({ "refreshToken": refresh_token })))
            .skip_auth_refresh(true);

        let result = self.exchange_refresh_token(&request).await;
        metrics::record_refresh(result.is_ok());
        let fresh = result?;

        let refresh = fresh.refresh_token.as_deref().unwrap_or(&refresh_token);
        self.tokens.store(&fresh.access_token, Some(refresh));
        tracing::info!(request_id = %request.request_id, "Access token refreshed");

        Ok(fresh.access_token)
    }

    async fn exchange_refresh_token(&self, request: &ApiRequest) -> ApiResult<AuthTokens> {
        let response = self.dispatch(request).await?.into_result()?;
        Ok(response.json()?)
    }

    /// Clear credentials, redirect once, and report the 401.
    fn end_session(&self, response: ApiResponse) -> ClassifiedError {
        self.tokens.clear();
        self.session.try_trigger_logout();
        classify(&RawError::status(response.status, response.body))
    }
}

pub(crate) fn to_value<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| RawError::from(e).into())
}

impl<T> std::fmt::Debug for RequestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("refresh_path", &self.refresh_path)
            .finish()
    }
}
