//! Task lifecycle management for Vermeer.
//!
//! [`GenerationOrchestrator`] turns user parameters into a validated request,
//! submits it, waits on a [`TaskPoller`] and records successful results with a
//! [`HistoryRecorder`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vermeer_core::{GenerationParams, ParameterOverrides};
//! use vermeer_generation::{GenerationOrchestrator, PollConfig};
//! # use vermeer_interface::{GenerationClient, HistoryStore, SettingsProvider};
//!
//! # async fn example(
//! #     client: Arc<dyn GenerationClient>,
//! #     settings: Arc<dyn SettingsProvider>,
//! #     history: Arc<dyn HistoryStore>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator =
//!     GenerationOrchestrator::new(client, settings, history, PollConfig::default());
//! let handle = orchestrator.start(
//!     GenerationParams::new("A beautiful sunset"),
//!     ParameterOverrides::default().with_width(512).with_height(768),
//! );
//! let result = handle.result().await?;
//! println!("{:?}", result.media_url());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod handle;
mod orchestrator;
mod poller;
mod recorder;
mod request;

pub use handle::GenerationHandle;
pub use orchestrator::GenerationOrchestrator;
pub use poller::{PollConfig, TaskPoller};
pub use recorder::{HistoryRecorder, history_item};
pub use request::{build_request, model_label};
