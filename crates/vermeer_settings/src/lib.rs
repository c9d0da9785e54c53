//! Configuration and user settings for Vermeer.
//!
//! [`VermeerConfig`] is the read-only application configuration (endpoints,
//! polling bounds, data locations). [`FileSettingsStore`] and
//! [`MemorySettingsStore`] implement the mutable user settings provider.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod memory;
mod store;

pub use config::{ApiConfig, PathsConfig, PollingConfig, VermeerConfig};
pub use memory::MemorySettingsStore;
pub use store::FileSettingsStore;
pub use vermeer_interface::check_api_key;
