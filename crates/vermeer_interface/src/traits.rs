//! Collaborator traits for the task lifecycle core.

use async_trait::async_trait;
use futures_util::stream::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::sync::watch;
use vermeer_core::{
    API_KEY_MIN_LENGTH, AiModel, GenerationRequest, HistoryItem, Modality, ModelProfile,
    NewHistoryItem, TaskHandle, TaskSnapshot, UserSettings,
};
use vermeer_error::{
    ApiResult, HistoryResult, SettingsError, SettingsErrorKind, SettingsResult, StorageResult,
};

/// Thin RPC wrapper over the provider's asynchronous task API.
///
/// Each method issues exactly one network call. Implementations never retry;
/// retry policy belongs to callers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Submit a request and return the provider-assigned task handle.
    async fn submit(&self, request: &GenerationRequest) -> ApiResult<TaskHandle>;

    /// Fetch the current status of a task.
    async fn fetch_status(&self, task_id: &str) -> ApiResult<TaskSnapshot>;

    /// Provider name (e.g., "novita").
    fn provider_name(&self) -> &'static str;
}

/// Read-only account and model discovery.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Models offered by the provider.
    ///
    /// Falls back to [`AiModel::fallback_catalog`] when the provider cannot be reached.
    async fn list_models(&self) -> Vec<AiModel>;

    /// Ask the provider whether the configured credential is accepted.
    ///
    /// Returns `Ok(false)` for a rejected key; other failures map into the API taxonomy.
    async fn verify_credentials(&self) -> ApiResult<bool>;

    /// Named model profiles.
    fn profiles(&self) -> Vec<ModelProfile> {
        ModelProfile::defaults()
    }
}

/// Live sequence of the full history, re-emitted after every committed write.
pub type HistoryStream = Pin<Box<dyn Stream<Item = HistoryResult<Vec<HistoryItem>>> + Send>>;

/// Durable store of past generations.
///
/// Queries order by `created_at` descending, ties broken by id descending.
/// Writes are serialized by the store; callers need no external locking.
/// Duplicate task ids are accepted.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a record and return its store-assigned id.
    async fn save(&self, item: NewHistoryItem) -> HistoryResult<i64>;

    /// Every record, newest first.
    async fn query_all(&self) -> HistoryResult<Vec<HistoryItem>>;

    /// Records of one modality, newest first.
    async fn query_by_modality(&self, modality: Modality) -> HistoryResult<Vec<HistoryItem>>;

    /// Records whose prompt contains `query`, case-insensitively, newest first.
    async fn search_by_prompt(&self, query: &str) -> HistoryResult<Vec<HistoryItem>>;

    /// Record by id.
    async fn find_by_id(&self, id: i64) -> HistoryResult<Option<HistoryItem>>;

    /// Most recently inserted record for a task id.
    async fn find_by_task_id(&self, task_id: &str) -> HistoryResult<Option<HistoryItem>>;

    /// Number of records.
    async fn count(&self) -> HistoryResult<i64>;

    /// Delete one record. Returns whether it existed.
    async fn delete_by_id(&self, id: i64) -> HistoryResult<bool>;

    /// Delete every record for a task id. Returns the number removed.
    async fn delete_by_task_id(&self, task_id: &str) -> HistoryResult<usize>;

    /// Delete everything. Returns the number removed.
    async fn clear_all(&self) -> HistoryResult<usize>;

    /// Set the local file path of a record, leaving every other field untouched.
    async fn update_local_path(&self, id: i64, path: &str) -> HistoryResult<()>;

    /// Live view of [`HistoryStore::query_all`].
    fn observe_all(&self) -> HistoryStream;
}

/// Source of the current user settings.
///
/// Consumers snapshot with [`SettingsProvider::current`] or follow changes
/// through [`SettingsProvider::subscribe`]. Readers never observe a
/// partially applied update.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Snapshot of the current settings.
    fn current(&self) -> UserSettings;

    /// Receiver notified after every persisted change.
    fn subscribe(&self) -> watch::Receiver<UserSettings>;

    /// Clamp, persist, then publish new settings. Last write wins.
    async fn update(&self, settings: UserSettings) -> SettingsResult<()>;

    /// Local sanity check of the stored API key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidApiKey` when no key is stored or it is shorter than
    /// the minimum length.
    fn validate_api_key(&self) -> SettingsResult<bool> {
        if self.current().has_valid_api_key() {
            Ok(true)
        } else {
            Err(SettingsError::new(SettingsErrorKind::InvalidApiKey(
                "API key not set or invalid".to_string(),
            )))
        }
    }

    /// Validate and store a new API key.
    async fn save_api_key(&self, api_key: &str) -> SettingsResult<()> {
        check_api_key(api_key)?;
        let mut settings = self.current();
        settings.api_key = Some(api_key.trim().to_string());
        self.update(settings).await
    }

    /// Remove the stored API key.
    async fn clear_api_key(&self) -> SettingsResult<()> {
        let mut settings = self.current();
        settings.api_key = None;
        self.update(settings).await
    }

    /// Forget every stored default so resolution uses the built-in fallbacks.
    ///
    /// The API key is kept.
    async fn reset_defaults(&self) -> SettingsResult<()> {
        let settings = UserSettings {
            api_key: self.current().api_key,
            ..UserSettings::default()
        };
        self.update(settings).await
    }
}

/// Reject blank keys and keys shorter than the minimum length.
///
/// # Examples
///
/// ```
/// use vermeer_interface::check_api_key;
///
/// assert!(check_api_key("").is_err());
/// assert!(check_api_key("short").is_err());
/// assert!(check_api_key("0123456789").is_ok());
/// ```
pub fn check_api_key(api_key: &str) -> SettingsResult<()> {
    let trimmed = api_key.trim();
    if trimmed.is_empty() {
        return Err(SettingsError::new(SettingsErrorKind::InvalidApiKey(
            "API key cannot be empty".to_string(),
        )));
    }
    if trimmed.len() < API_KEY_MIN_LENGTH {
        return Err(SettingsError::new(SettingsErrorKind::InvalidApiKey(
            "API key is too short".to_string(),
        )));
    }
    Ok(())
}

/// Copies remote result media to local storage.
#[async_trait]
pub trait MediaArchiver: Send + Sync {
    /// Download `url` and return the local path it was stored at.
    async fn archive(&self, url: &str, modality: Modality) -> StorageResult<PathBuf>;
}
