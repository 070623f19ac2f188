//! HTTP transport.
//!
//! # Responsibilities
//! - Turn an [`ApiRequest`] into a network call against the base URL
//! - Report every received response as `Ok`, whatever its status
//! - Send `Content-Type`/`Accept: application/json` on every request
//! - Report failures to get a response as [`RawError`]

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::config::ClientConfig;
use crate::errors::RawError;
use crate::http::request::{ApiRequest, REQUEST_ID_HEADER};
use crate::http::response::ApiResponse;

const JSON: &str = "application/json";

/// Something that can deliver a request and bring back the response.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, RawError>> + Send;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a client with the configured timeouts.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .build()?;

        Ok(Self::from_client(client, config.base_url()))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, RawError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url_for(&request.path))
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .headers(request.headers.clone())
            .header(REQUEST_ID_HEADER, request.request_id.as_str());

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            RawError::no_response(format!("connection lost while reading response body: {}", e))
        })?;

        Ok(ApiResponse { status, body })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}
