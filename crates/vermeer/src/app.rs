//! Wiring of the production collaborators.

use std::sync::Arc;
use tracing::{info, instrument};
use vermeer_client::{ApiKeyCache, NovitaClient};
use vermeer_error::VermeerResult;
use vermeer_generation::{GenerationOrchestrator, PollConfig};
use vermeer_history::SqliteHistoryStore;
use vermeer_interface::SettingsProvider;
use vermeer_settings::{FileSettingsStore, VermeerConfig};
use vermeer_storage::{FileSystemStorage, MediaDownloader};

/// A fully wired Vermeer instance.
///
/// Settings live in `settings.toml`, history in `history.sqlite3` and
/// downloads under `media/`, all inside the configured data directory.
#[derive(Debug, Clone)]
pub struct VermeerApp {
    config: VermeerConfig,
    settings: Arc<FileSettingsStore>,
    client: Arc<NovitaClient>,
    history: Arc<SqliteHistoryStore>,
    orchestrator: GenerationOrchestrator,
}

impl VermeerApp {
    /// Open every store under the configured data directory.
    ///
    /// `api_key_override` shadows the stored key for this process without
    /// being written to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings, history or media storage cannot be opened.
    #[instrument(skip_all, fields(data_dir = %config.paths.data_dir().display()))]
    pub async fn open(
        config: VermeerConfig,
        api_key_override: Option<String>,
    ) -> VermeerResult<Self> {
        let settings = Arc::new(
            FileSettingsStore::open(config.paths.settings_path())
                .await?
                .with_api_key_override(api_key_override),
        );

        let api_key = ApiKeyCache::follow(settings.subscribe());
        let client = Arc::new(NovitaClient::new(&config.api, api_key)?);
        let history = Arc::new(SqliteHistoryStore::open(config.paths.history_path())?);

        let storage = Arc::new(FileSystemStorage::new(config.paths.media_dir())?);
        let downloader = Arc::new(MediaDownloader::new(storage, config.api.request_timeout())?);

        let orchestrator = GenerationOrchestrator::new(
            client.clone(),
            settings.clone(),
            history.clone(),
            PollConfig::from(config.polling),
        )
        .with_archiver(downloader);

        info!("Vermeer ready");
        Ok(Self {
            config,
            settings,
            client,
            history,
            orchestrator,
        })
    }

    /// Application configuration in effect.
    pub fn config(&self) -> &VermeerConfig {
        &self.config
    }

    /// User settings store.
    pub fn settings(&self) -> &Arc<FileSettingsStore> {
        &self.settings
    }

    /// Provider client.
    pub fn client(&self) -> &Arc<NovitaClient> {
        &self.client
    }

    /// Generation history.
    pub fn history(&self) -> &Arc<SqliteHistoryStore> {
        &self.history
    }

    /// Generation orchestrator.
    pub fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.orchestrator
    }
}
