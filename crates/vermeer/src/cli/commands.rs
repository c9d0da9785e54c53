//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vermeer::{Modality, Modifier};

/// Vermeer - asynchronous image and video generation
#[derive(Parser, Debug)]
#[command(name = "vermeer")]
#[command(about = "Asynchronous image and video generation with local history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file to use instead of the default search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a generation and wait for the result
    Generate(GenerateArgs),

    /// Fetch the current status of a remote task
    Status {
        /// Provider task identifier
        task_id: String,
    },

    /// Generation history
    #[command(subcommand)]
    History(HistoryCommands),

    /// User settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// List available models
    Models,

    /// List built-in model profiles
    Profiles,
}

/// Arguments for `generate`
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Positive prompt (taken from the remixed item when omitted)
    pub prompt: Option<String>,

    /// Negative prompt
    #[arg(long)]
    pub negative: Option<String>,

    /// Generation modality (text_to_image, image_to_image, ...)
    #[arg(long)]
    pub modality: Option<Modality>,

    /// Output width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Sampling steps
    #[arg(long)]
    pub steps: Option<u32>,

    /// Guidance scale
    #[arg(long)]
    pub cfg: Option<f32>,

    /// Sampler name
    #[arg(long)]
    pub sampler: Option<String>,

    /// Fixed seed
    #[arg(long)]
    pub seed: Option<i64>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Built-in profile id (overrides --model)
    #[arg(long)]
    pub profile: Option<String>,

    /// Images per task
    #[arg(long)]
    pub count: Option<u32>,

    /// Request NSFW content
    #[arg(long)]
    pub nsfw: bool,

    /// Enable the high-resolution fix pass
    #[arg(long)]
    pub hires: bool,

    /// Enable face restoration
    #[arg(long)]
    pub face_restore: bool,

    /// Source image for image-conditioned modalities
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Mask image for inpainting
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// LoRA modifier as name:weight (repeatable)
    #[arg(long = "lora", value_parser = parse_modifier)]
    pub loras: Vec<Modifier>,

    /// Start from the parameters of a history item
    #[arg(long)]
    pub remix: Option<i64>,
}

/// History subcommands
#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List history items, newest first
    List {
        /// Only this modality
        #[arg(long)]
        modality: Option<Modality>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Search prompts (case-insensitive)
    Search {
        /// Text to look for
        query: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Show one history item as JSON
    Show {
        /// History item id
        id: i64,
    },

    /// Delete one history item
    Delete {
        /// History item id
        id: i64,
    },

    /// Delete every item for a task
    DeleteTask {
        /// Provider task identifier
        task_id: String,
    },

    /// Delete all history
    Clear,

    /// Number of stored items
    Count,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print current settings
    Show,

    /// Change stored defaults
    Set {
        /// Default model identifier
        #[arg(long)]
        model: Option<String>,

        /// Default sampler
        #[arg(long)]
        sampler: Option<String>,

        /// Default width
        #[arg(long)]
        width: Option<u32>,

        /// Default height
        #[arg(long)]
        height: Option<u32>,

        /// Default steps
        #[arg(long)]
        steps: Option<u32>,

        /// Default guidance scale
        #[arg(long)]
        cfg: Option<f32>,

        /// Record successful generations
        #[arg(long)]
        save_history: Option<bool>,

        /// Download results after saving them
        #[arg(long)]
        auto_download: Option<bool>,
    },

    /// Store or remove the API key
    ApiKey {
        /// Novita API key
        #[arg(required_unless_present = "clear")]
        key: Option<String>,

        /// Remove the stored key instead
        #[arg(long, conflicts_with = "key")]
        clear: bool,
    },

    /// Forget stored defaults, keeping the API key
    Reset,

    /// Check the stored API key
    Validate {
        /// Also ask the provider whether the key is accepted
        #[arg(long)]
        remote: bool,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable format
    #[default]
    Human,
    /// JSON format
    Json,
}

/// Parse `name:weight` into a modifier.
pub fn parse_modifier(raw: &str) -> Result<Modifier, String> {
    let (name, weight) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected name:weight, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("modifier name must not be empty".to_string());
    }
    let weight: f32 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{}'", weight))?;
    Ok(Modifier::new(name, weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_modifier() {
        let modifier = parse_modifier("add_detail:0.6").unwrap();
        assert_eq!(modifier.name, "add_detail");
        assert_eq!(modifier.weight, 0.6);
        assert!(parse_modifier("no-weight").is_err());
        assert!(parse_modifier(":0.5").is_err());
        assert!(parse_modifier("x:heavy").is_err());
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::parse_from([
            "vermeer",
            "generate",
            "A beautiful sunset",
            "--modality",
            "image_to_image",
            "--width",
            "3000",
            "--lora",
            "add_detail:0.5",
            "--lora",
            "film:0.3",
            "--nsfw",
        ]);

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.prompt.as_deref(), Some("A beautiful sunset"));
                assert_eq!(args.modality, Some(Modality::ImageToImage));
                assert_eq!(args.width, Some(3000));
                assert_eq!(args.loras.len(), 2);
                assert!(args.nsfw);
            }
            other => panic!("expected generate, got {:?}", other),
        }
    }

    #[test]
    fn test_api_key_store_or_clear() {
        let cli = Cli::parse_from(["vermeer", "settings", "api-key", "--clear"]);
        assert!(matches!(
            cli.command,
            Commands::Settings(SettingsCommands::ApiKey { key: None, clear: true })
        ));

        let cli = Cli::parse_from(["vermeer", "settings", "api-key", "sk-test-0123456789"]);
        match cli.command {
            Commands::Settings(SettingsCommands::ApiKey { key, clear }) => {
                assert_eq!(key.as_deref(), Some("sk-test-0123456789"));
                assert!(!clear);
            }
            other => panic!("expected api-key, got {:?}", other),
        }

        assert!(Cli::try_parse_from(["vermeer", "settings", "api-key"]).is_err());
        assert!(
            Cli::try_parse_from(["vermeer", "settings", "api-key", "sk-x-0123456789", "--clear"])
                .is_err()
        );
    }
}
