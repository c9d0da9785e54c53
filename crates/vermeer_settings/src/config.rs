//! Application configuration loading.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (include_str! from vermeer.toml)
//! - `~/.config/vermeer/vermeer.toml`
//! - `./vermeer.toml`
//! - `VERMEER__<SECTION>__<KEY>` environment variables

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};
use vermeer_error::{ConfigError, VermeerError, VermeerResult};

/// Provider API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined to
    pub base_url: String,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.novita.ai".to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 120,
        }
    }
}

impl ApiConfig {
    /// Connect timeout as a duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Task polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between status fetches
    pub interval_ms: u64,
    /// Overall bound on waiting for a terminal status
    pub max_wait_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_wait_ms: 300_000,
        }
    }
}

/// On-disk locations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root for settings, history and media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl PathsConfig {
    /// Configured data directory, or the platform data directory joined with `vermeer`.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vermeer"),
        }
    }

    /// Path of the persisted user settings.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir().join("settings.toml")
    }

    /// Path of the history database.
    pub fn history_path(&self) -> PathBuf {
        self.data_dir().join("history.sqlite3")
    }

    /// Root of the downloaded media store.
    pub fn media_dir(&self) -> PathBuf {
        self.data_dir().join("media")
    }
}

/// Top-level Vermeer configuration.
///
/// # Example
///
/// ```no_run
/// use vermeer_settings::VermeerConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VermeerConfig::load()?;
/// println!("Polling every {} ms", config.polling.interval_ms);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VermeerConfig {
    /// Provider API connection
    #[serde(default)]
    pub api: ApiConfig,
    /// Task polling
    #[serde(default)]
    pub polling: PollingConfig,
    /// On-disk locations
    #[serde(default)]
    pub paths: PathsConfig,
}

const DEFAULT_CONFIG: &str = include_str!("../../../vermeer.toml");

impl VermeerConfig {
    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse.
    pub fn bundled() -> VermeerResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file path, on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VermeerResult<Self> {
        debug!("Loading configuration from file");

        let path = path.as_ref();
        if !path.exists() {
            return Err(VermeerError::from(ConfigError::new(format!(
                "Configuration file not found: {}",
                path.display()
            ))));
        }

        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path)),
        )
    }

    /// Load configuration with precedence: env > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if any present source fails to parse.
    #[instrument]
    pub fn load() -> VermeerResult<Self> {
        debug!(
            "Loading configuration with precedence: env > current dir > home dir > bundled defaults"
        );

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/vermeer/vermeer.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("vermeer").required(false))
            .add_source(Environment::with_prefix("VERMEER").separator("__"));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> VermeerResult<Self> {
        builder
            .build()
            .map_err(|e| {
                VermeerError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VermeerError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
