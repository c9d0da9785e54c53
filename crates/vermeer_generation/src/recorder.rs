//! Turning successful results into history records.

use std::sync::Arc;
use tracing::{info, instrument};
use vermeer_core::{GenerationRequest, GenerationResult, NewHistoryItem};
use vermeer_error::HistoryResult;
use vermeer_interface::HistoryStore;

/// Persists successful generations to a [`HistoryStore`].
#[derive(Clone)]
pub struct HistoryRecorder {
    store: Arc<dyn HistoryStore>,
}

impl std::fmt::Debug for HistoryRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryRecorder").finish_non_exhaustive()
    }
}

impl HistoryRecorder {
    /// Recorder writing to `store`.
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for queries and deletes.
    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    /// Save `result` with the parameters of the request that produced it.
    ///
    /// Returns the new record's id.
    #[instrument(skip_all, fields(task_id = %result.task_id))]
    pub async fn record(
        &self,
        result: &GenerationResult,
        request: &GenerationRequest,
        model_name: &str,
    ) -> HistoryResult<i64> {
        let item = history_item(result, request, model_name);
        let id = self.store.save(item).await?;
        info!(id, "Recorded generation");
        Ok(id)
    }

    /// Fill in the downloaded copy of a record's media.
    pub async fn attach_local_path(&self, id: i64, path: &str) -> HistoryResult<()> {
        self.store.update_local_path(id, path).await
    }
}

/// Build the history record for a finished generation.
pub fn history_item(
    result: &GenerationResult,
    request: &GenerationRequest,
    model_name: &str,
) -> NewHistoryItem {
    NewHistoryItem {
        task_id: result.task_id.clone(),
        modality: result.modality,
        prompt: request.prompt().clone(),
        negative_prompt: request.negative_prompt().clone(),
        thumbnail_url: result
            .image_url
            .as_deref()
            .or(result.media_url())
            .unwrap_or_default()
            .to_string(),
        result_url: result.media_url().map(str::to_string),
        model_name: model_name.to_string(),
        sampler: Some(request.sampler().clone()),
        steps: Some(*request.steps()),
        cfg_scale: Some(*request.cfg_scale()),
        seed: *request.seed(),
        image_count: *request.image_count(),
        flags: *request.flags(),
        created_at: result.completed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vermeer_core::{Modality, TaskStatus};

    fn result(modality: Modality, image: Option<&str>, video: Option<&str>) -> GenerationResult {
        GenerationResult {
            task_id: "task_abc123".to_string(),
            modality,
            status: TaskStatus::Success,
            image_url: image.map(str::to_string),
            video_url: video.map(str::to_string),
            error_message: None,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_history_item_copies_request() {
        let request = GenerationRequest::builder()
            .prompt("A beautiful sunset")
            .negative_prompt(Some("blurry".to_string()))
            .steps(30u32)
            .seed(Some(7i64))
            .build()
            .unwrap();
        let result = result(Modality::TextToImage, Some("https://x/1.png"), None);

        let item = history_item(&result, &request, "meinamix_v11");
        assert_eq!(item.task_id, "task_abc123");
        assert_eq!(item.prompt, "A beautiful sunset");
        assert_eq!(item.negative_prompt.as_deref(), Some("blurry"));
        assert_eq!(item.thumbnail_url, "https://x/1.png");
        assert_eq!(item.result_url.as_deref(), Some("https://x/1.png"));
        assert_eq!(item.steps, Some(30));
        assert_eq!(item.seed, Some(7));
        assert_eq!(item.sampler.as_deref(), Some("Euler a"));
        assert_eq!(item.created_at, result.completed_at);
    }

    #[test]
    fn test_video_prefers_preview_image_for_thumbnail() {
        let request = GenerationRequest::builder()
            .prompt("waves")
            .modality(Modality::TextToVideo)
            .build()
            .unwrap();
        let result = result(
            Modality::TextToVideo,
            Some("https://x/preview.png"),
            Some("https://x/clip.mp4"),
        );

        let item = history_item(&result, &request, "stableVideoDiffusion");
        assert_eq!(item.thumbnail_url, "https://x/preview.png");
        assert_eq!(item.result_url.as_deref(), Some("https://x/clip.mp4"));
    }
}
