//! Top-level error wrapper types.

use crate::{
    ApiError, ConfigError, HistoryError, JsonError, OrchestratorError, PollError, SettingsError,
    StorageError,
};

/// Every error a Vermeer operation can surface.
///
/// # Examples
///
/// ```
/// use vermeer_error::{ApiError, ApiErrorKind, VermeerError};
///
/// let api_err = ApiError::new(ApiErrorKind::Network("reset".to_string()));
/// let err: VermeerError = api_err.into();
/// assert!(format!("{}", err).contains("API Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VermeerErrorKind {
    /// Generation API error
    #[from(ApiError)]
    Api(ApiError),
    /// Task polling error
    #[from(PollError)]
    Poll(PollError),
    /// Generation orchestration error
    #[from(OrchestratorError)]
    Orchestrator(OrchestratorError),
    /// History store error
    #[from(HistoryError)]
    History(HistoryError),
    /// User settings error
    #[from(SettingsError)]
    Settings(SettingsError),
    /// Media storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON output error
    #[from(JsonError)]
    Json(JsonError),
}

/// Vermeer error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vermeer_error::{ConfigError, VermeerResult};
///
/// fn might_fail() -> VermeerResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vermeer Error: {}", _0)]
pub struct VermeerError(Box<VermeerErrorKind>);

impl VermeerError {
    /// Create a new error from a kind.
    pub fn new(kind: VermeerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VermeerErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VermeerErrorKind
impl<T> From<T> for VermeerError
where
    T: Into<VermeerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vermeer operations.
pub type VermeerResult<T> = std::result::Result<T, VermeerError>;
