//! In-memory settings provider.

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use vermeer_core::UserSettings;
use vermeer_error::SettingsResult;
use vermeer_interface::SettingsProvider;

/// Settings held only in memory.
///
/// Same publication semantics as the file-backed store. Used for tests and
/// one-shot invocations that should not touch disk.
#[derive(Debug)]
pub struct MemorySettingsStore {
    sender: watch::Sender<UserSettings>,
    write_lock: Mutex<()>,
}

impl MemorySettingsStore {
    /// Start from the given settings, clamped.
    pub fn new(settings: UserSettings) -> Self {
        let (sender, _) = watch::channel(settings.clamped());
        Self {
            sender,
            write_lock: Mutex::new(()),
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new(UserSettings::default())
    }
}

#[async_trait]
impl SettingsProvider for MemorySettingsStore {
    fn current(&self) -> UserSettings {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<UserSettings> {
        self.sender.subscribe()
    }

    async fn update(&self, settings: UserSettings) -> SettingsResult<()> {
        let _guard = self.write_lock.lock().await;
        self.sender.send_replace(settings.clamped());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_is_clamped_and_published() {
        let store = MemorySettingsStore::default();
        let mut receiver = store.subscribe();

        store
            .update(UserSettings::default().with_default_steps(Some(999)))
            .await
            .unwrap();

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().default_steps, Some(150));
        assert_eq!(store.current().default_steps, Some(150));
    }

    #[tokio::test]
    async fn test_validate_api_key_messages() {
        let store = MemorySettingsStore::default();
        let err = store.validate_api_key().unwrap_err();
        assert_eq!(err.kind.to_string(), "API key not set or invalid");

        let err = store.save_api_key("   ").await.unwrap_err();
        assert_eq!(err.kind.to_string(), "API key cannot be empty");

        let err = store.save_api_key("abc").await.unwrap_err();
        assert_eq!(err.kind.to_string(), "API key is too short");

        store.save_api_key("  sk-0123456789  ").await.unwrap();
        assert_eq!(store.current().api_key.as_deref(), Some("sk-0123456789"));
        assert!(store.validate_api_key().unwrap());
    }
}
