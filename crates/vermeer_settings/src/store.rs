//! File-backed settings provider.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument};
use vermeer_core::UserSettings;
use vermeer_error::{SettingsError, SettingsErrorKind, SettingsResult};
use vermeer_interface::SettingsProvider;

/// Settings persisted as a TOML file.
///
/// Writes go to a temporary sibling and are renamed into place, so the file
/// is never observed half written. Updates are serialized and published on a
/// watch channel only after they reach disk.
///
/// An API key override (from the environment) shadows the stored key for the
/// lifetime of the store and is never written to disk.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    persisted: Mutex<UserSettings>,
    sender: watch::Sender<UserSettings>,
    api_key_override: Option<String>,
}

impl FileSettingsStore {
    /// Open the store, reading the file if it exists.
    ///
    /// A missing file yields default settings; nothing is written until the
    /// first update.
    ///
    /// # Errors
    ///
    /// Returns `Load` if the file cannot be read and `Parse` if it is not
    /// valid settings TOML.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(text) => toml::from_str::<UserSettings>(&text)
                .map_err(|e| SettingsError::new(SettingsErrorKind::Parse(e.to_string())))?
                .clamped(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file yet, using defaults");
                UserSettings::default()
            }
            Err(e) => {
                return Err(SettingsError::new(SettingsErrorKind::Load(format!(
                    "{}: {}",
                    path.display(),
                    e
                ))));
            }
        };

        let (sender, _) = watch::channel(settings.clone());
        Ok(Self {
            path,
            persisted: Mutex::new(settings),
            sender,
            api_key_override: None,
        })
    }

    /// Shadow the stored API key without persisting the override.
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        self.api_key_override = api_key.filter(|k| !k.trim().is_empty());
        let persisted = self.persisted.get_mut().clone();
        let effective = self.effective(persisted);
        self.sender.send_replace(effective);
        self
    }

    /// Location of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn effective(&self, mut settings: UserSettings) -> UserSettings {
        if let Some(key) = &self.api_key_override {
            settings.api_key = Some(key.clone());
        }
        settings
    }

    async fn write_atomic(&self, settings: &UserSettings) -> SettingsResult<()> {
        let text = toml::to_string_pretty(settings)
            .map_err(|e| SettingsError::new(SettingsErrorKind::Persist(e.to_string())))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SettingsError::new(SettingsErrorKind::Persist(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp = self.path.with_extension("toml.tmp");
        tokio::fs::write(&temp, text).await.map_err(|e| {
            SettingsError::new(SettingsErrorKind::Persist(format!(
                "{}: {}",
                temp.display(),
                e
            )))
        })?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            SettingsError::new(SettingsErrorKind::Persist(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        Ok(())
    }
}

#[async_trait]
impl SettingsProvider for FileSettingsStore {
    fn current(&self) -> UserSettings {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<UserSettings> {
        self.sender.subscribe()
    }

    #[instrument(skip(self, settings), fields(path = %self.path.display()))]
    async fn update(&self, settings: UserSettings) -> SettingsResult<()> {
        let mut persisted = self.persisted.lock().await;

        let mut to_store = settings.clamped();
        if self.api_key_override.is_some() && to_store.api_key == self.api_key_override {
            to_store.api_key = persisted.api_key.clone();
        }

        self.write_atomic(&to_store).await?;
        *persisted = to_store.clone();
        self.sender.send_replace(self.effective(to_store));

        info!("Settings saved");
        Ok(())
    }
}
