//! In-memory API key cache kept current from the settings channel.

use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::debug;
use vermeer_core::UserSettings;

/// Latest known API key.
///
/// Reads are synchronous and never touch settings storage.
#[derive(Clone, Default)]
pub struct ApiKeyCache {
    key: Arc<RwLock<Option<String>>>,
}

impl ApiKeyCache {
    /// A cache holding a fixed key.
    pub fn fixed(key: Option<String>) -> Self {
        Self {
            key: Arc::new(RwLock::new(key)),
        }
    }

    /// A cache that follows the settings channel.
    ///
    /// Spawns a task that refreshes the key after every settings change and
    /// stops when the sender is dropped. Must be called within a tokio runtime.
    pub fn follow(mut receiver: watch::Receiver<UserSettings>) -> Self {
        let initial = receiver.borrow_and_update().api_key.clone();
        let cache = Self::fixed(initial);

        let key = cache.key.clone();
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let latest = receiver.borrow_and_update().api_key.clone();
                let mut guard = key.write().unwrap_or_else(|e| e.into_inner());
                *guard = latest;
                debug!(present = guard.is_some(), "API key cache refreshed");
            }
        });

        cache
    }

    /// Current key, if any.
    pub fn get(&self) -> Option<String> {
        self.key
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the cached key.
    pub fn set(&self, key: Option<String>) {
        *self.key.write().unwrap_or_else(|e| e.into_inner()) = key;
    }
}

impl std::fmt::Debug for ApiKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCache")
            .field("present", &self.get().is_some())
            .finish()
    }
}
