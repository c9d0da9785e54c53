//! SQLite persistence for Vermeer generation history.
//!
//! [`SqliteHistoryStore`] implements [`vermeer_interface::HistoryStore`] on a
//! diesel-managed SQLite database with embedded migrations.
//!
//! # Example
//!
//! ```no_run
//! use vermeer_core::{Modality, NewHistoryItem};
//! use vermeer_history::SqliteHistoryStore;
//! use vermeer_interface::HistoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteHistoryStore::open("history.sqlite3")?;
//! let id = store
//!     .save(NewHistoryItem::new("task_abc123", Modality::TextToImage, "A beautiful sunset"))
//!     .await?;
//! assert!(store.find_by_id(id).await?.is_some());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod connection;
mod models;
mod repository;
pub mod schema;

pub use connection::{establish_connection, establish_in_memory, run_migrations};
pub use models::{HistoryRow, NewHistoryRow};
pub use repository::SqliteHistoryStore;

// Re-export error types from vermeer_error
pub use vermeer_error::{HistoryError, HistoryErrorKind, HistoryResult};
