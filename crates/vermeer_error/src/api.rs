//! Generation API error types.

use crate::RetryableError;

/// Failure conditions of a single call to the generation API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ApiErrorKind {
    /// Connectivity or timeout failure at the transport
    #[display("Network error: {}", _0)]
    Network(String),
    /// Non-2xx response from the provider
    #[display("HTTP {} error: {}", status, message)]
    Http {
        /// HTTP status code
        status: u16,
        /// Message from the provider's error envelope, or the raw body
        message: String,
    },
    /// Response missing required fields or not parseable
    #[display("Malformed response: {}", _0)]
    Malformed(String),
    /// Request could not be encoded for the provider
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
}

impl ApiErrorKind {
    /// HTTP status code, if this is an HTTP failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiErrorKind::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller's own retry policy may try again.
    ///
    /// Client errors (4xx other than 408 and 429) are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiErrorKind::Network(_) => true,
            ApiErrorKind::Http { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            ApiErrorKind::Malformed(_) | ApiErrorKind::InvalidRequest(_) => false,
        }
    }

    /// Retry parameters as `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            ApiErrorKind::Http { status, .. } => match *status {
                429 => (5000, 3, 40),
                503 => (2000, 5, 60),
                500 | 502 | 504 => (1000, 3, 8),
                408 => (2000, 4, 30),
                _ => (2000, 3, 30),
            },
            ApiErrorKind::Network(_) => (1000, 4, 20),
            _ => (2000, 3, 30),
        }
    }
}

/// Generation API error with source location tracking.
///
/// # Examples
///
/// ```
/// use vermeer_error::{ApiError, ApiErrorKind};
///
/// let err = ApiError::new(ApiErrorKind::Http {
///     status: 401,
///     message: "Invalid API key".to_string(),
/// });
/// assert_eq!(err.kind.status(), Some(401));
/// assert!(format!("{}", err).contains("HTTP 401"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("API Error: {} at line {} in {}", kind, line, file)]
pub struct ApiError {
    /// The kind of error that occurred
    pub kind: ApiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ApiError {
    /// Create a new ApiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for ApiError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}

/// Result type for generation API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_permanent() {
        for status in [400, 401, 403, 404, 422] {
            let kind = ApiErrorKind::Http {
                status,
                message: String::new(),
            };
            assert!(!kind.is_retryable(), "{} should not be retryable", status);
        }
    }

    #[test]
    fn test_server_errors_and_network_are_retryable() {
        for status in [408, 429, 500, 502, 503, 504] {
            let kind = ApiErrorKind::Http {
                status,
                message: String::new(),
            };
            assert!(kind.is_retryable(), "{} should be retryable", status);
        }
        assert!(ApiErrorKind::Network("reset".to_string()).is_retryable());
        assert!(!ApiErrorKind::Malformed("no task_id".to_string()).is_retryable());
    }

    #[test]
    fn test_location_is_captured() {
        let err = ApiError::new(ApiErrorKind::Malformed("missing".to_string()));
        assert!(err.file.ends_with("api.rs"));
        assert!(err.line > 0);
    }
}
