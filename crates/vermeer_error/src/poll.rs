//! Task polling error types.

use crate::ApiError;

/// Reasons a wait for a terminal task state can fail.
#[derive(Debug, Clone, derive_more::Display)]
pub enum PollErrorKind {
    /// Wait budget exhausted before a terminal snapshot
    #[display("Timed out after {}ms and {} polls", elapsed_ms, polls)]
    Timeout {
        /// Milliseconds spent waiting
        elapsed_ms: u64,
        /// Status fetches issued
        polls: usize,
    },
    /// A poll attempt itself failed
    #[display("Poll failed: {}", _0)]
    Upstream(ApiError),
    /// Caller abandoned the wait
    #[display("Polling cancelled by caller")]
    Cancelled,
}

/// Polling error with source location tracking.
///
/// # Examples
///
/// ```
/// use vermeer_error::{PollError, PollErrorKind};
///
/// let err = PollError::new(PollErrorKind::Timeout { elapsed_ms: 6000, polls: 3 });
/// assert!(err.is_timeout());
/// assert!(format!("{}", err).contains("3 polls"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Poll Error: {} at line {} in {}", kind, line, file)]
pub struct PollError {
    /// The kind of error that occurred
    pub kind: PollErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PollError {
    /// Create a new PollError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PollErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the wait budget ran out.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, PollErrorKind::Timeout { .. })
    }

    /// True when the caller cancelled the wait.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, PollErrorKind::Cancelled)
    }
}

impl From<ApiError> for PollError {
    #[track_caller]
    fn from(err: ApiError) -> Self {
        PollError::new(PollErrorKind::Upstream(err))
    }
}

/// Result type for polling operations.
pub type PollResult<T> = std::result::Result<T, PollError>;
