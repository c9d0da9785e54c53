//! Trait definitions for the Vermeer media generation client.
//!
//! The task lifecycle core talks to its collaborators only through these traits:
//! the remote generation API, the history store, the settings provider and the
//! optional media archiver.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{
    GenerationClient, HistoryStore, HistoryStream, MediaArchiver, ModelCatalog, SettingsProvider,
    check_api_key,
};
