//! Lookup error types.

use ssid_core::enums::FailureKind;
use thiserror::Error;

/// Errors that can occur when querying a location source.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP transport error (connect failure, timeout, broken body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// No answer within the lookup deadline.
    #[error("lookup timed out after {secs}s")]
    Timeout {
        /// Deadline that elapsed.
        secs: u64,
    },

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The service answered 200 but flagged the query as unsuccessful.
    #[error("query rejected: {0}")]
    Rejected(String),

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// No API credentials were configured.
    #[error("WiGLE credentials are not configured (set WIGLE_API_NAME and WIGLE_API_TOKEN)")]
    MissingCredentials,
}

impl LookupError {
    /// Classify the failure for caching and reporting.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Http(_) | Self::Timeout { .. } | Self::RateLimited { .. } => FailureKind::Transient,
            Self::Api { status, .. } => match *status {
                401 | 403 => FailureKind::Unauthorized,
                500..=599 => FailureKind::Transient,
                _ => FailureKind::Rejected,
            },
            Self::Rejected(_) => FailureKind::Rejected,
            Self::Parse(_) => FailureKind::Malformed,
            Self::MissingCredentials => FailureKind::Unauthorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(400, FailureKind::Rejected)]
    #[case(401, FailureKind::Unauthorized)]
    #[case(403, FailureKind::Unauthorized)]
    #[case(404, FailureKind::Rejected)]
    #[case(500, FailureKind::Transient)]
    #[case(503, FailureKind::Transient)]
    fn api_status_classification(#[case] status: u16, #[case] expected: FailureKind) {
        let err = LookupError::Api {
            status,
            message: String::new(),
        };
        assert_eq!(err.kind(), expected);
    }

    #[test]
    fn timeout_is_transient() {
        assert_eq!(LookupError::Timeout { secs: 10 }.kind(), FailureKind::Transient);
    }

    #[test]
    fn rate_limit_is_transient() {
        let err = LookupError::RateLimited {
            retry_after_secs: 60,
        };
        assert_eq!(err.kind(), FailureKind::Transient);
    }

    #[test]
    fn body_problems_are_terminal() {
        assert_eq!(LookupError::Parse("eof".into()).kind(), FailureKind::Malformed);
        assert_eq!(
            LookupError::Rejected("too many queries today".into()).kind(),
            FailureKind::Rejected
        );
        assert!(LookupError::Parse("eof".into()).kind().is_terminal());
    }

    #[test]
    fn missing_credentials_is_unauthorized() {
        assert_eq!(
            LookupError::MissingCredentials.kind(),
            FailureKind::Unauthorized
        );
    }
}
