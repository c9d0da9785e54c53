//! Error types for the Vermeer media generation client.
//!
//! This crate provides the error types shared by every Vermeer crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vermeer_error::{ApiError, ApiErrorKind, VermeerResult};
//!
//! fn submit() -> VermeerResult<String> {
//!     Err(ApiError::new(ApiErrorKind::Network("connection refused".to_string())))?
//! }
//!
//! match submit() {
//!     Ok(task_id) => println!("Submitted: {}", task_id),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod history;
mod json;
mod orchestrator;
mod poll;
mod retry;
mod settings;
mod storage;

pub use api::{ApiError, ApiErrorKind, ApiResult};
pub use config::ConfigError;
pub use error::{VermeerError, VermeerErrorKind, VermeerResult};
pub use history::{HistoryError, HistoryErrorKind, HistoryResult};
pub use json::JsonError;
pub use orchestrator::{OrchestratorError, OrchestratorErrorKind, OrchestratorResult};
pub use poll::{PollError, PollErrorKind, PollResult};
pub use retry::RetryableError;
pub use settings::{SettingsError, SettingsErrorKind, SettingsResult};
pub use storage::{StorageError, StorageErrorKind, StorageResult};
