//! Vermeer CLI binary.
//!
//! This binary provides command-line access to Vermeer's functionality:
//! - Submit generations and wait for their results
//! - Browse, search and prune the local history
//! - Manage stored settings and the API key

use clap::Parser;
use vermeer::{VermeerApp, VermeerConfig};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use cli::{
        Cli, Commands, handle_history_command, handle_settings_command, list_models,
        list_profiles, run_generation, show_status,
    };

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    vermeer::init_tracing(cli.verbose, cli.json_logs)?;

    let config = match &cli.config {
        Some(path) => VermeerConfig::from_file(path)?,
        None => VermeerConfig::load()?,
    };

    // Environment key shadows the stored one without being persisted
    let api_key_override = std::env::var("VERMEER_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    // Profiles need no stores
    if let Commands::Profiles = cli.command {
        list_profiles()?;
        return Ok(());
    }

    let app = VermeerApp::open(config, api_key_override).await?;

    // Execute the requested command
    match cli.command {
        Commands::Generate(args) => {
            run_generation(&app, args).await?;
        }

        Commands::Status { task_id } => {
            show_status(&app, &task_id).await?;
        }

        Commands::History(history_cmd) => {
            handle_history_command(&app, history_cmd).await?;
        }

        Commands::Settings(settings_cmd) => {
            handle_settings_command(&app, settings_cmd).await?;
        }

        Commands::Models => {
            list_models(&app).await?;
        }

        Commands::Profiles => {
            list_profiles()?;
        }
    }

    Ok(())
}
