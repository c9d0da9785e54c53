//! Vermeer - asynchronous media generation client.
//!
//! Vermeer submits text/image-to-image and video generation tasks to the
//! Novita async API, polls them to completion and keeps a local history of
//! successful generations.
//!
//! # Quick Start
//!
//! ```no_run
//! use vermeer::{GenerationParams, ParameterOverrides, VermeerApp, VermeerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = VermeerApp::open(VermeerConfig::load()?, None).await?;
//!
//!     let result = app
//!         .orchestrator()
//!         .create_image(
//!             &GenerationParams::new("A beautiful sunset"),
//!             &ParameterOverrides::default().with_width(512).with_height(768),
//!         )
//!         .await?;
//!
//!     println!("{:?}", result.media_url());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `vermeer_core` - Data model and resolution rules
//! - `vermeer_interface` - Collaborator traits
//! - `vermeer_error` - Error types
//! - `vermeer_settings` - Configuration and user settings
//! - `vermeer_client` - Novita HTTP client
//! - `vermeer_history` - SQLite history
//! - `vermeer_storage` - Local media storage and downloads
//! - `vermeer_generation` - Poller, orchestrator and recorder
//!
//! This crate re-exports everything for convenience.

mod app;

pub use app::VermeerApp;

// Re-export core crates
pub use vermeer_core::*;
pub use vermeer_error::*;
pub use vermeer_interface::*;

pub use vermeer_client::{ApiKeyCache, NovitaClient};
pub use vermeer_generation::{
    GenerationHandle, GenerationOrchestrator, HistoryRecorder, PollConfig, TaskPoller,
    build_request,
};
pub use vermeer_history::SqliteHistoryStore;
pub use vermeer_settings::{
    ApiConfig, FileSettingsStore, MemorySettingsStore, PathsConfig, PollingConfig, VermeerConfig,
};
pub use vermeer_storage::{
    FileSystemStorage, MediaDownloader, MediaMetadata, MediaReference, MediaStorage, MediaType,
};
