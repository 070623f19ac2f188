//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that base URLs parse and endpoint paths are rooted
//! - Validate value ranges (timeouts > 0, base delay > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("{field} must start with '/'")]
    RelativePath { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("retries.retryable_status_codes contains {0}, which is not an HTTP error status")]
    InvalidStatusCode(u16),

    #[error("observability.log_format must be 'pretty' or 'json', got '{0}'")]
    UnknownLogFormat(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("api.development_url", &config.api.development_url),
        ("api.production_url", &config.api.production_url),
    ] {
        if let Err(e) = Url::parse(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                reason: e.to_string(),
            });
        }
    }

    for (field, value) in [
        ("api.login_path", &config.api.login_path),
        ("api.register_path", &config.api.register_path),
        ("api.refresh_path", &config.api.refresh_path),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativePath { field });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::NotPositive {
            field: "timeouts.request_secs",
        });
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::NotPositive {
            field: "timeouts.connect_secs",
        });
    }
    if config.retries.base_delay_ms == 0 {
        errors.push(ValidationError::NotPositive {
            field: "retries.base_delay_ms",
        });
    }

    for code in &config.retries.retryable_status_codes {
        if !(400..=599).contains(code) {
            errors.push(ValidationError::InvalidStatusCode(*code));
        }
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
