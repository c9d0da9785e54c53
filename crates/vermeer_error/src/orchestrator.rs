//! Generation orchestration error types.

use crate::{ApiError, PollError};

/// Failure conditions of a full generation (validate, submit, wait).
#[derive(Debug, Clone, derive_more::Display)]
pub enum OrchestratorErrorKind {
    /// Local validation failure, no network call was made
    #[display("Invalid input: {}", _0)]
    InvalidInput(String),
    /// NSFW requested against a profile that disallows it, no network call was made
    #[display("Policy violation: {}", _0)]
    PolicyViolation(String),
    /// Submission failed, the poller was never started
    #[display("Submission failed: {}", _0)]
    Api(ApiError),
    /// Waiting for the terminal state failed
    #[display("Waiting for task failed: {}", _0)]
    Poll(PollError),
}

/// Orchestration error with source location tracking.
///
/// # Examples
///
/// ```
/// use vermeer_error::{OrchestratorError, OrchestratorErrorKind};
///
/// let err = OrchestratorError::new(OrchestratorErrorKind::InvalidInput(
///     "prompt required".to_string(),
/// ));
/// assert!(format!("{}", err).contains("prompt required"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Orchestrator Error: {} at line {} in {}", kind, line, file)]
pub struct OrchestratorError {
    /// The kind of error that occurred
    pub kind: OrchestratorErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl OrchestratorError {
    /// Create a new OrchestratorError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OrchestratorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an input validation failure.
    #[track_caller]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(OrchestratorErrorKind::InvalidInput(message.into()))
    }
}

impl From<ApiError> for OrchestratorError {
    #[track_caller]
    fn from(err: ApiError) -> Self {
        OrchestratorError::new(OrchestratorErrorKind::Api(err))
    }
}

impl From<PollError> for OrchestratorError {
    #[track_caller]
    fn from(err: PollError) -> Self {
        OrchestratorError::new(OrchestratorErrorKind::Poll(err))
    }
}

/// Result type for orchestration.
pub type OrchestratorResult<T> = std::result::Result<T, OrchestratorError>;
