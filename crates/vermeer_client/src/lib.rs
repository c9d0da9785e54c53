//! HTTP client for the Novita asynchronous task API.
//!
//! [`NovitaClient`] implements both [`vermeer_interface::GenerationClient`]
//! and [`vermeer_interface::ModelCatalog`]. Request signing reads the API key
//! from an [`ApiKeyCache`], which can follow the settings channel.
//!
//! # Example
//!
//! ```no_run
//! use vermeer_client::{ApiKeyCache, NovitaClient};
//! use vermeer_core::{GenerationRequest, Modality};
//! use vermeer_interface::GenerationClient;
//! use vermeer_settings::ApiConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NovitaClient::new(
//!     &ApiConfig::default(),
//!     ApiKeyCache::fixed(Some("sk-...".to_string())),
//! )?;
//! let request = GenerationRequest::builder()
//!     .prompt("A beautiful sunset")
//!     .modality(Modality::TextToImage)
//!     .build()?;
//! let handle = client.submit(&request).await?;
//! println!("Submitted {}", handle.task_id());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod client;
pub mod conversion;
mod dto;

pub use auth::ApiKeyCache;
pub use client::NovitaClient;
pub use dto::{
    LoraDto, MediaEntryDto, ModelInfoDto, SubmitResponse, TaskErrorDto, TaskIdDto, TaskInfoDto,
    TaskRequestBody, TaskRequestBodyBuilder, TaskResultDto, TaskStatusDto,
};
