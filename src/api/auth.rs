//! Login, registration and logout.
//!
//! These calls never go through the 401 refresh path: a 401 here means bad
//! credentials, not an expired session.

use reqwest::Method;

use crate::api::models::{AuthResponse, Credentials, Registration};
use crate::config::schema::ApiConfig;
use crate::errors::ApiResult;
use crate::http::client::to_value;
use crate::http::{RequestClient, RequestOptions, Transport};

pub struct AuthApi<'a, T> {
    client: &'a RequestClient<T>,
    config: &'a ApiConfig,
}

impl<'a, T: Transport> AuthApi<'a, T> {
    pub fn new(client: &'a RequestClient<T>, config: &'a ApiConfig) -> Self {
        Self { client, config }
    }

    /// Exchange credentials for tokens and persist them.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        let response = self
            .authenticate(&self.config.login_path, to_value(credentials)?)
            .await?;
        tracing::info!(email = %credentials.email, "Logged in");
        Ok(response)
    }

    /// Create an account; the API logs the new user in directly.
    pub async fn register(&self, registration: &Registration) -> ApiResult<AuthResponse> {
        let response = self
            .authenticate(&self.config.register_path, to_value(registration)?)
            .await?;
        tracing::info!(email = %registration.email, "Registered");
        Ok(response)
    }

    /// Drop both tokens. Purely local; the API keeps no session to end.
    pub fn logout(&self) {
        self.client.tokens().clear();
        tracing::info!("Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.tokens().access_token().is_some()
    }

    async fn authenticate(&self, path: &str, body: serde_json::Value) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self
            .client
            .request(
                Method::POST,
                path,
                Some(body),
                &RequestOptions::without_auth_refresh(),
            )
            .await?;

        self.client.tokens().store(
            &response.tokens.access_token,
            response.tokens.refresh_token.as_deref(),
        );
        Ok(response)
    }
}
