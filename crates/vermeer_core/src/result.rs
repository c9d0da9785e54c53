//! Terminal generation results.

use crate::{Modality, TaskSnapshot, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error message for a success snapshot that carried no media.
pub const SUCCESS_WITHOUT_MEDIA: &str = "task reported success without media";

/// Final outcome of a generation task.
///
/// A `Success` result always carries at least one of `image_url` / `video_url`;
/// `Failed` and `Cancelled` results never carry a media URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Task identifier
    pub task_id: String,
    /// Kind of generation
    pub modality: Modality,
    /// Terminal status
    pub status: TaskStatus,
    /// First image URL, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// First video URL, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Provider error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// When the terminal snapshot was observed
    pub completed_at: DateTime<Utc>,
}

impl GenerationResult {
    /// Map a terminal snapshot to a result.
    ///
    /// Returns `None` for a non-terminal snapshot. The mapping is a pure function
    /// of its inputs. A success snapshot without any media URL becomes `Failed`
    /// with [`SUCCESS_WITHOUT_MEDIA`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use vermeer_core::{GenerationResult, Modality, TaskSnapshot, TaskStatus};
    ///
    /// let mut snapshot = TaskSnapshot::new("task_abc123", TaskStatus::Success);
    /// snapshot.image_urls.push("https://x/1.png".to_string());
    ///
    /// let result = GenerationResult::from_terminal(&snapshot, Modality::TextToImage, Utc::now())
    ///     .unwrap();
    /// assert_eq!(result.image_url.as_deref(), Some("https://x/1.png"));
    /// ```
    pub fn from_terminal(
        snapshot: &TaskSnapshot,
        modality: Modality,
        completed_at: DateTime<Utc>,
    ) -> Option<Self> {
        let mut result = Self {
            task_id: snapshot.task_id.clone(),
            modality,
            status: snapshot.status,
            image_url: None,
            video_url: None,
            error_message: snapshot.error_message.clone(),
            completed_at,
        };

        match snapshot.status {
            TaskStatus::Pending | TaskStatus::Processing => return None,
            TaskStatus::Success => {
                result.image_url = snapshot.image_urls.first().cloned();
                result.video_url = snapshot.video_urls.first().cloned();
                if result.image_url.is_none() && result.video_url.is_none() {
                    result.status = TaskStatus::Failed;
                    result.error_message = Some(SUCCESS_WITHOUT_MEDIA.to_string());
                }
            }
            TaskStatus::Failed | TaskStatus::Cancelled => {}
        }

        Some(result)
    }

    /// Whether the generation produced media.
    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }

    /// The primary media URL, preferring video for video modalities.
    pub fn media_url(&self) -> Option<&str> {
        if self.modality.produces_video() {
            self.video_url.as_deref().or(self.image_url.as_deref())
        } else {
            self.image_url.as_deref().or(self.video_url.as_deref())
        }
    }
}
