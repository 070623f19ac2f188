//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Selects development or production values.
pub const ENV_ENVIRONMENT: &str = "BUDGET_ENV";
/// Overrides the base URL of the selected environment.
pub const ENV_API_URL: &str = "BUDGET_API_URL";
pub const ENV_AUTH_DOMAIN: &str = "BUDGET_AUTH_DOMAIN";
pub const ENV_AUTH_CLIENT_ID: &str = "BUDGET_AUTH_CLIENT_ID";
pub const ENV_AUTH_AUDIENCE: &str = "BUDGET_AUTH_AUDIENCE";
pub const ENV_AUTH_REDIRECT_URI: &str = "BUDGET_AUTH_REDIRECT_URI";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply process environment overrides and validate.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    load_config_str(&content, |var| std::env::var(var).ok())
}

/// Build a configuration from defaults plus the process environment.
pub fn config_from_env() -> Result<ClientConfig, ConfigError> {
    load_config_str("", |var| std::env::var(var).ok())
}

/// Parse TOML text, apply overrides from `lookup` and validate.
pub fn load_config_str<F>(content: &str, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: ClientConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, lookup)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply deployment-time overrides. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(value) = get(ENV_ENVIRONMENT) {
        config.environment = value.parse().map_err(|reason| ConfigError::Env {
            var: ENV_ENVIRONMENT,
            reason,
        })?;
    }

    if let Some(url) = get(ENV_API_URL) {
        match config.environment {
            crate::config::Environment::Development => config.api.development_url = url,
            crate::config::Environment::Production => config.api.production_url = url,
        }
    }

    let provider = &mut config.auth_provider;
    for (var, slot) in [
        (ENV_AUTH_DOMAIN, &mut provider.domain),
        (ENV_AUTH_CLIENT_ID, &mut provider.client_id),
        (ENV_AUTH_AUDIENCE, &mut provider.audience),
        (ENV_AUTH_REDIRECT_URI, &mut provider.redirect_uri),
    ] {
        if let Some(value) = get(var) {
            *slot = value;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::config::Environment;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_env_selects_production_url() {
        let config = load_config_str(
            "",
            env(&[
                ("BUDGET_ENV", "production"),
                ("BUDGET_API_URL", "https://budget.internal/api"),
                ("BUDGET_AUTH_CLIENT_ID", "abc123"),
            ]),
        )
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.base_url(), "https://budget.internal/api");
        assert_eq!(config.api.development_url, "http://localhost:3000/api");
        assert_eq!(config.auth_provider.client_id, "abc123");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config = load_config_str("", env(&[("BUDGET_API_URL", "  ")])).unwrap();
        assert_eq!(config.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_invalid_environment_flag() {
        let err = load_config_str("", env(&[("BUDGET_ENV", "staging")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "BUDGET_ENV", .. }));
    }

    #[test]
    fn test_validation_failure_is_reported() {
        let err = load_config_str("[timeouts]\nrequest_secs = 0\n", env(&[])).unwrap_err();
        assert!(err.to_string().contains("timeouts.request_secs"));
    }

    #[test]
    fn test_load_from_file() {
        let path =
            std::env::temp_dir().join(format!("budget-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[retries]\nmax_retries = 5\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.retries.max_retries, 5);
        std::fs::remove_file(&path).unwrap_or_default();
    }
}
