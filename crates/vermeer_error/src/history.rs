//! History store error types.

/// History store error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum HistoryErrorKind {
    /// Connection failed
    #[display("History database connection error: {}", _0)]
    Connection(String),
    /// Query execution failed
    #[display("History query error: {}", _0)]
    Query(String),
    /// Migration error
    #[display("Migration error: {}", _0)]
    Migration(String),
    /// Stored value could not be converted to a domain value
    #[display("Corrupt history record: {}", _0)]
    Serialization(String),
    /// Record not found
    #[display("History record not found")]
    NotFound,
}

/// History store error with source location tracking.
///
/// # Examples
///
/// ```
/// use vermeer_error::{HistoryError, HistoryErrorKind};
///
/// let err = HistoryError::new(HistoryErrorKind::NotFound);
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("History Error: {} at line {} in {}", kind, line, file)]
pub struct HistoryError {
    /// The kind of error that occurred
    pub kind: HistoryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl HistoryError {
    /// Create a new HistoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HistoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

// Diesel error conversions (only available with database feature)
#[cfg(feature = "database")]
impl From<diesel::result::Error> for HistoryError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => HistoryError::new(HistoryErrorKind::NotFound),
            _ => HistoryError::new(HistoryErrorKind::Query(err.to_string())),
        }
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for HistoryError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        HistoryError::new(HistoryErrorKind::Connection(err.to_string()))
    }
}

/// Result type for history operations.
pub type HistoryResult<T> = std::result::Result<T, HistoryError>;
