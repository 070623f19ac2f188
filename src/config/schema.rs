//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Root configuration for the budgeting API client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Deployment environment; selects the API base URL.
    pub environment: Environment,

    /// Budgeting API endpoints.
    pub api: ApiConfig,

    /// External authentication provider parameters.
    pub auth_provider: AuthProviderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Client-side persistence.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ClientConfig {
    /// Base URL of the API for the configured environment.
    pub fn base_url(&self) -> &str {
        match self.environment {
            Environment::Development => &self.api.development_url,
            Environment::Production => &self.api.production_url,
        }
    }
}

/// Deployment environment flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// API endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL used in development.
    pub development_url: String,

    /// Base URL used in production.
    pub production_url: String,

    /// Login endpoint path.
    pub login_path: String,

    /// Registration endpoint path.
    pub register_path: String,

    /// Token refresh endpoint path.
    pub refresh_path: String,

    /// Extra reads of a freshly created resource that may 404 before it
    /// becomes visible.
    pub not_found_retries: u32,

    /// Delay between those reads in milliseconds.
    pub not_found_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            development_url: "http://localhost:3000/api".to_string(),
            production_url: "https://api.budget.example.com/api".to_string(),
            login_path: "/auth/login".to_string(),
            register_path: "/auth/register".to_string(),
            refresh_path: "/auth/refresh-token".to_string(),
            not_found_retries: 3,
            not_found_delay_ms: 1000,
        }
    }
}

/// Authentication provider parameters, supplied at deployment time.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthProviderConfig {
    pub domain: String,
    pub client_id: String,
    pub audience: String,
    pub redirect_uri: String,
}

/// Timeout configuration for transport calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per-call timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,

    /// Base delay for backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Status codes worth retrying.
    pub retryable_status_codes: BTreeSet<u16>,

    /// Double the delay on each retry instead of waiting a flat `base_delay_ms`.
    pub use_exponential_backoff: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            retryable_status_codes: [408, 429, 500, 502, 503, 504].into_iter().collect(),
            use_exponential_backoff: true,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Client-side persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the key-value store. In-memory when absent.
    pub path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format: "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
