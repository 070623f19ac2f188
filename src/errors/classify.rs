//! Raw failure classification.
//!
//! # Responsibilities
//! - Represent every failure a transport can produce ([`RawError`])
//! - Map it onto the closed taxonomy ([`ErrorKind`])
//! - Pick a user-facing message and normalise field errors
//!
//! # Design Decisions
//! - `classify` is total and pure: any input yields a well-formed error
//! - Field errors are only attached to VALIDATION errors

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::errors::kind::ErrorKind;
use crate::errors::payload::ErrorPayload;

/// A failure as reported by the transport, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawError {
    /// No response was received.
    NoResponse { message: String },
    /// A response arrived with a non-success status.
    Status {
        status: u16,
        body: String,
        message: Option<String>,
    },
    /// Any other failure (request construction, body decoding, ...).
    Other { message: String },
}

impl RawError {
    pub fn no_response(message: impl Into<String>) -> Self {
        RawError::NoResponse {
            message: message.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        RawError::Status {
            status,
            body: body.into(),
            message: None,
        }
    }

    pub fn other(message: impl fmt::Display) -> Self {
        RawError::Other {
            message: message.to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            RawError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawError::NoResponse { message } => write!(f, "no response: {}", message),
            RawError::Status { status, .. } => {
                write!(f, "request failed with status code {}", status)
            }
            RawError::Other { message } => f.write_str(message),
        }
    }
}

impl From<reqwest::Error> for RawError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return RawError::Status {
                status: status.as_u16(),
                body: String::new(),
                message: Some(err.to_string()),
            };
        }
        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            RawError::no_response(err.to_string())
        } else {
            RawError::other(err)
        }
    }
}

impl From<serde_json::Error> for RawError {
    fn from(err: serde_json::Error) -> Self {
        RawError::other(format!("invalid response body: {}", err))
    }
}

/// A failure normalised for display and retry decisions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{kind}] {message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
    status_code: Option<u16>,
    field_errors: Option<BTreeMap<String, String>>,
    code: Option<String>,
}

impl ClassifiedError {
    /// Blank messages are replaced by the kind's fallback.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.fallback_message().to_string()
        } else {
            message
        };
        Self {
            kind,
            message,
            status_code: None,
            field_errors: None,
            code: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Business, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach field errors. Ignored unless the kind is VALIDATION or the map
    /// is empty.
    pub fn with_field_errors(mut self, errors: BTreeMap<String, String>) -> Self {
        if self.kind == ErrorKind::Validation && !errors.is_empty() {
            self.field_errors = Some(errors);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        self.field_errors.as_ref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Notification title for this error.
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

impl From<RawError> for ClassifiedError {
    fn from(raw: RawError) -> Self {
        classify(&raw)
    }
}

/// Classify a raw failure. Never panics.
pub fn classify(raw: &RawError) -> ClassifiedError {
    let classified = match raw {
        RawError::NoResponse { message } => {
            tracing::debug!(cause = %message, "No response received");
            ClassifiedError::network(ErrorKind::Network.fallback_message())
        }
        RawError::Status {
            status,
            body,
            message,
        } => classify_status(*status, body, message.as_deref()),
        RawError::Other { message } => ClassifiedError::new(ErrorKind::Unknown, message.as_str()),
    };

    tracing::debug!(
        kind = %classified.kind,
        status = ?classified.status_code,
        message = %classified.message,
        "Classified request failure"
    );
    classified
}

fn classify_status(status: u16, body: &str, raw_message: Option<&str>) -> ClassifiedError {
    let kind = ErrorKind::from_status(status);
    let payload = ErrorPayload::parse(body).unwrap_or_default();

    let message = [payload.message.as_deref(), raw_message]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty())
        .unwrap_or(kind.fallback_message());

    let mut classified = ClassifiedError::new(kind, message).with_status(status);
    if let Some(code) = payload.code.filter(|c| !c.is_empty()) {
        classified = classified.with_code(code);
    }
    if let Some(errors) = payload.errors {
        classified = classified.with_field_errors(errors.into_map());
    }
    classified
}
