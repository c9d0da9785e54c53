//! Remote task identity and point-in-time status.

use crate::TaskStatus;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Handle on a submitted remote task.
///
/// Created right after a successful submission and owned by the poller
/// until a terminal result is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TaskHandle {
    /// Opaque provider-assigned identifier
    task_id: String,
    /// When the submission was accepted
    submitted_at: DateTime<Utc>,
}

impl TaskHandle {
    /// Create a handle stamped with the current time.
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// Status of a task as observed by one poll.
///
/// Produced fresh on every poll and never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Task identifier
    pub task_id: String,
    /// Mapped status
    pub status: TaskStatus,
    /// Completion fraction in `[0, 1]`, when reported
    pub progress: Option<f32>,
    /// Image result URLs, in provider order
    pub image_urls: Vec<String>,
    /// Video result URLs, in provider order
    pub video_urls: Vec<String>,
    /// Provider error message, when reported
    pub error_message: Option<String>,
}

impl TaskSnapshot {
    /// Snapshot with only an id and a status.
    pub fn new(task_id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            ..Default::default()
        }
    }

    /// All result URLs, images first.
    pub fn result_urls(&self) -> impl Iterator<Item = &str> {
        self.image_urls
            .iter()
            .chain(self.video_urls.iter())
            .map(String::as_str)
    }
}
