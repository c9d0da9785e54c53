//! Collaborator doubles for history and downloads.

use async_trait::async_trait;
use futures_util::stream;
use std::path::PathBuf;
use std::sync::Mutex;
use vermeer_core::{HistoryItem, Modality, NewHistoryItem};
use vermeer_error::{HistoryError, HistoryErrorKind, HistoryResult, StorageResult};
use vermeer_interface::{HistoryStore, HistoryStream, MediaArchiver};

fn unavailable<T>() -> HistoryResult<T> {
    Err(HistoryError::new(HistoryErrorKind::Connection(
        "database is locked".to_string(),
    )))
}

/// History store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingHistoryStore;

#[async_trait]
impl HistoryStore for FailingHistoryStore {
    async fn save(&self, _item: NewHistoryItem) -> HistoryResult<i64> {
        unavailable()
    }

    async fn query_all(&self) -> HistoryResult<Vec<HistoryItem>> {
        unavailable()
    }

    async fn query_by_modality(&self, _modality: Modality) -> HistoryResult<Vec<HistoryItem>> {
        unavailable()
    }

    async fn search_by_prompt(&self, _query: &str) -> HistoryResult<Vec<HistoryItem>> {
        unavailable()
    }

    async fn find_by_id(&self, _id: i64) -> HistoryResult<Option<HistoryItem>> {
        unavailable()
    }

    async fn find_by_task_id(&self, _task_id: &str) -> HistoryResult<Option<HistoryItem>> {
        unavailable()
    }

    async fn count(&self) -> HistoryResult<i64> {
        unavailable()
    }

    async fn delete_by_id(&self, _id: i64) -> HistoryResult<bool> {
        unavailable()
    }

    async fn delete_by_task_id(&self, _task_id: &str) -> HistoryResult<usize> {
        unavailable()
    }

    async fn clear_all(&self) -> HistoryResult<usize> {
        unavailable()
    }

    async fn update_local_path(&self, _id: i64, _path: &str) -> HistoryResult<()> {
        unavailable()
    }

    fn observe_all(&self) -> HistoryStream {
        Box::pin(stream::once(async { unavailable() }))
    }
}

/// Archiver that records requested URLs and returns a fixed path.
#[derive(Debug)]
pub struct RecordingArchiver {
    path: PathBuf,
    urls: Mutex<Vec<(String, Modality)>>,
}

#[allow(dead_code)]
impl RecordingArchiver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<(String, Modality)> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaArchiver for RecordingArchiver {
    async fn archive(&self, url: &str, modality: Modality) -> StorageResult<PathBuf> {
        self.urls.lock().unwrap().push((url.to_string(), modality));
        Ok(self.path.clone())
    }
}
