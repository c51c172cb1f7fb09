//! Error types for the client library.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Error response from the API.
///
/// Wraps the detailed error information returned by the DLP service.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// The error detail object from the API.
    pub error: ErrorDetail,
}

/// Detailed error information from the API.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    /// The error message text describing what went wrong.
    pub message: String,
}

/// Errors that can occur when tokenizing or detokenizing through the
/// DLP service.
///
/// The taxonomy splits into four classes: caller-input validation,
/// wrapped-key transport decoding, remote service failures, and the
/// logical surrogate mismatch at reversal time. Validation and decode
/// errors are raised before any network call is made.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DlpError {
    /// Bad caller input.
    ///
    /// An empty project or an empty info-type list. Raised before the
    /// request is ever submitted.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The wrapped key is not valid in its transport encoding.
    ///
    /// The base64 ciphertext of the content-encryption key failed to
    /// decode. Raised before the request is ever submitted.
    #[error("Wrapped key decode error: {0}")]
    KeyDecode(#[from] base64::DecodeError),

    /// Network or HTTP request failure.
    ///
    /// Indicates issues like DNS resolution, connection failures, or
    /// socket errors. These errors are typically retryable.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Middleware layer error.
    ///
    /// Errors from request/response middleware such as retry logic.
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// JSON serialization or deserialization error.
    ///
    /// Occurs when request/response JSON cannot be properly encoded or
    /// decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API authentication failure (HTTP 401/403).
    ///
    /// The credentials are missing, invalid, or lack permission on the
    /// project or KMS key.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Rate limit or quota exceeded (HTTP 429).
    #[error("Rate limit exceeded: {retry_after:?}")]
    RateLimit {
        /// Suggested wait time before retrying, if provided by the API.
        retry_after: Option<Duration>,
    },

    /// Request timeout.
    ///
    /// The exchange took longer than the configured timeout.
    #[error("Timeout error")]
    Timeout,

    /// Client configuration issue.
    ///
    /// Invalid base URL, or no credentials available at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote call failed.
    ///
    /// Server errors, malformed requests rejected by the service, and
    /// any other non-success status not covered above.
    #[error("Service error: {0}")]
    Service(String),

    /// Unexpected or malformed API response.
    ///
    /// The service returned data that doesn't match the expected shape,
    /// e.g. a response without an item value.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Reversal was attempted with the wrong surrogate pairing.
    ///
    /// The service does not signal this explicitly: a mismatched
    /// surrogate yields an unchanged string (or garbage) rather than the
    /// original. The unchanged case is detectable locally and surfaces
    /// here; a changed-but-wrong result cannot be detected.
    #[error("Surrogate mismatch: no spans marked {surrogate} were reversed")]
    SurrogateMismatch {
        /// The surrogate type the caller asked to reverse.
        surrogate: String,
    },
}

impl DlpError {
    /// Check if this error is potentially retryable.
    ///
    /// Returns `true` for network errors, timeouts, rate limits, and
    /// remote service failures. Validation, key-decode, and surrogate
    /// mismatches are deterministic and never retryable.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Middleware(_)
                | Self::Timeout
                | Self::RateLimit { .. }
                | Self::Service(_)
        )
    }

    /// Check if this error was raised before any network call.
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::KeyDecode(_) | Self::Configuration(_)
        )
    }

    /// Check if this is an authentication error.
    pub const fn is_authentication_error(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Get the retry-after duration if this is a rate limit error.
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_errors_not_retryable() {
        let validation = DlpError::Validation("info type list must not be empty".to_string());
        assert!(validation.is_local());
        assert!(!validation.is_retryable());

        let mismatch = DlpError::SurrogateMismatch {
            surrogate: "NAME_TOKEN".to_string(),
        };
        assert!(!mismatch.is_local());
        assert!(!mismatch.is_retryable());
    }

    #[test]
    fn test_service_errors_retryable() {
        assert!(DlpError::Timeout.is_retryable());
        assert!(DlpError::Service("backend unavailable".to_string()).is_retryable());
        assert!(DlpError::RateLimit { retry_after: None }.is_retryable());
    }

    #[test]
    fn test_retry_after_only_on_rate_limit() {
        let limited = DlpError::RateLimit {
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(DlpError::Timeout.retry_after(), None);
    }
}
