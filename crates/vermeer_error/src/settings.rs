//! User settings error types.

/// User settings error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SettingsErrorKind {
    /// Settings file could not be read
    #[display("Failed to load settings: {}", _0)]
    Load(String),
    /// Settings file could not be written
    #[display("Failed to persist settings: {}", _0)]
    Persist(String),
    /// Settings file content is not valid
    #[display("Failed to parse settings: {}", _0)]
    Parse(String),
    /// API key rejected by local validation
    #[display("{}", _0)]
    InvalidApiKey(String),
}

/// Settings error with source location tracking.
///
/// # Examples
///
/// ```
/// use vermeer_error::{SettingsError, SettingsErrorKind};
///
/// let err = SettingsError::new(SettingsErrorKind::InvalidApiKey(
///     "API key is too short".to_string(),
/// ));
/// assert!(format!("{}", err).contains("too short"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Settings Error: {} at line {} in {}", kind, line, file)]
pub struct SettingsError {
    /// The kind of error that occurred
    pub kind: SettingsErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SettingsError {
    /// Create a new SettingsError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SettingsErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;
