//! Closed error taxonomy.

use serde::Serialize;

/// Kind of a classified failure.
///
/// The set is closed: every failure the client surfaces carries exactly one
/// of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No response was received (connection refused, aborted, timed out).
    Network,
    /// 401 - credentials missing, expired or rejected.
    Authentication,
    /// 403 - authenticated but not allowed.
    Authorization,
    /// 400 - request rejected, usually with per-field detail.
    Validation,
    /// 500, 502, 503, 504.
    Server,
    /// 404.
    NotFound,
    /// A domain rule was violated before or after reaching the server.
    Business,
    /// Anything else.
    Unknown,
}

impl ErrorKind {
    /// Map an HTTP status code onto the taxonomy.
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            500 | 502 | 503 | 504 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }

    /// Title shown above a notification for this kind.
    pub const fn title(&self) -> &'static str {
        match self {
            ErrorKind::Network => "Connection Error",
            ErrorKind::Authentication => "Authentication Required",
            ErrorKind::Authorization => "Access Denied",
            ErrorKind::Validation => "Validation Error",
            ErrorKind::Server => "Server Error",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Business => "Request Rejected",
            ErrorKind::Unknown => "Unexpected Error",
        }
    }

    /// Message used when neither the server nor the transport supplied one.
    pub const fn fallback_message(&self) -> &'static str {
        match self {
            ErrorKind::Network => {
                "Unable to reach the server. Please check your internet connection."
            }
            ErrorKind::Authentication => "Your session has expired. Please log in again.",
            ErrorKind::Authorization => "You do not have permission to perform this action.",
            ErrorKind::Validation => "Some of the submitted values are invalid.",
            ErrorKind::Server => "The server encountered an error. Please try again later.",
            ErrorKind::NotFound => "The requested resource could not be found.",
            ErrorKind::Business => "The request could not be completed.",
            ErrorKind::Unknown => "An unexpected error occurred.",
        }
    }

    /// Kinds that are never worth retrying, whatever the status code says.
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            ErrorKind::Validation
                | ErrorKind::Authentication
                | ErrorKind::Authorization
                | ErrorKind::NotFound
                | ErrorKind::Business
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK",
            ErrorKind::Authentication => "AUTHENTICATION",
            ErrorKind::Authorization => "AUTHORIZATION",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Server => "SERVER",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Business => "BUSINESS",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Authentication);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Authorization);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        for status in [500, 502, 503, 504] {
            assert_eq!(ErrorKind::from_status(status), ErrorKind::Server);
        }
        for status in [0, 200, 408, 409, 422, 429, 501, 599] {
            assert_eq!(ErrorKind::from_status(status), ErrorKind::Unknown);
        }
    }

    #[test]
    fn test_titles_and_fallbacks_are_non_empty() {
        let all = [
            ErrorKind::Network,
            ErrorKind::Authentication,
            ErrorKind::Authorization,
            ErrorKind::Validation,
            ErrorKind::Server,
            ErrorKind::NotFound,
            ErrorKind::Business,
            ErrorKind::Unknown,
        ];
        for kind in all {
            assert!(!kind.title().is_empty());
            assert!(!kind.fallback_message().is_empty());
        }
        assert_eq!(ErrorKind::Network.title(), "Connection Error");
        assert_eq!(ErrorKind::Authorization.title(), "Access Denied");
    }

    #[test]
    fn test_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }
}
