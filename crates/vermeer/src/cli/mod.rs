//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the vermeer binary.

mod catalog;
mod commands;
mod generate;
mod history;
mod output;
mod settings;

pub use catalog::{list_models, list_profiles, show_status};
pub use commands::{Cli, Commands};
pub use generate::run_generation;
pub use history::handle_history_command;
pub use settings::handle_settings_command;
