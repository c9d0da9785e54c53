//! End-to-end generation: validate, submit, poll, record.

use crate::request::{build_request, model_label};
use crate::{GenerationHandle, HistoryRecorder, PollConfig, TaskPoller};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info, info_span, instrument, warn};
use vermeer_core::{
    GenerationParams, GenerationRequest, GenerationResult, GenerationState, ParameterOverrides,
    TaskStatus, UserSettings,
};
use vermeer_error::{OrchestratorResult, PollError, PollErrorKind};
use vermeer_interface::{GenerationClient, HistoryStore, MediaArchiver, SettingsProvider};

/// Publishes state changes when the caller asked for them.
#[derive(Clone, Copy)]
struct StatePublisher<'a>(Option<&'a watch::Sender<GenerationState>>);

impl StatePublisher<'_> {
    fn publish(&self, state: GenerationState) {
        if let Some(sender) = self.0 {
            sender.send_replace(state);
        }
    }
}

/// Runs generations from parameters to a terminal result.
///
/// Settings are read once per generation, at submission time, so later edits
/// never change a request in flight. Generations share nothing but the
/// settings provider and history store; each call gets its own poller loop.
/// History saving is best effort: a failed save is logged and the successful
/// result is still returned.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    client: Arc<dyn GenerationClient>,
    settings: Arc<dyn SettingsProvider>,
    recorder: HistoryRecorder,
    poller: TaskPoller,
    archiver: Option<Arc<dyn MediaArchiver>>,
    background: TaskTracker,
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("provider", &self.client.provider_name())
            .field("poller", &self.poller)
            .field("archiver", &self.archiver.is_some())
            .field("background", &self.background.len())
            .finish()
    }
}

impl GenerationOrchestrator {
    /// Orchestrator over the given collaborators.
    pub fn new(
        client: Arc<dyn GenerationClient>,
        settings: Arc<dyn SettingsProvider>,
        history: Arc<dyn HistoryStore>,
        poll_config: PollConfig,
    ) -> Self {
        Self {
            poller: TaskPoller::new(Arc::clone(&client), poll_config),
            client,
            settings,
            recorder: HistoryRecorder::new(history),
            archiver: None,
            background: TaskTracker::new(),
        }
    }

    /// Download results in the background when auto-download is enabled.
    pub fn with_archiver(mut self, archiver: Arc<dyn MediaArchiver>) -> Self {
        self.archiver = Some(archiver);
        self
    }

    /// History recorder used after successful generations.
    pub fn recorder(&self) -> &HistoryRecorder {
        &self.recorder
    }

    /// Poller used for every generation.
    pub fn poller(&self) -> &TaskPoller {
        &self.poller
    }

    /// Generate with a fresh cancellation token and no state channel.
    ///
    /// # Errors
    ///
    /// See [`generate`](Self::generate).
    pub async fn create_image(
        &self,
        params: &GenerationParams,
        overrides: &ParameterOverrides,
    ) -> OrchestratorResult<GenerationResult> {
        self.generate(params, overrides, &CancellationToken::new(), None)
            .await
    }

    /// Spawn a generation and return a handle to observe or cancel it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        &self,
        params: GenerationParams,
        overrides: ParameterOverrides,
    ) -> GenerationHandle {
        let (sender, receiver) = watch::channel(GenerationState::Idle);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let orchestrator = self.clone();

        let task = tokio::spawn(async move {
            orchestrator
                .generate(&params, &overrides, &token, Some(&sender))
                .await
        });

        GenerationHandle::new(receiver, cancel, task)
    }

    /// Validate, submit, wait for a terminal state and record the result.
    ///
    /// A remote FAILED or CANCELLED outcome is a successful call returning a
    /// non-success [`GenerationResult`]. `state`, when given, receives every
    /// lifecycle change and ends in `Completed` or `Failed`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` / `PolicyViolation` before any network call
    /// - `Api` if submission fails
    /// - `Poll` if waiting fails, times out or is cancelled
    #[instrument(skip_all, fields(modality = %params.modality))]
    pub async fn generate(
        &self,
        params: &GenerationParams,
        overrides: &ParameterOverrides,
        cancel: &CancellationToken,
        state: Option<&watch::Sender<GenerationState>>,
    ) -> OrchestratorResult<GenerationResult> {
        let publisher = StatePublisher(state);
        let outcome = self.run(params, overrides, cancel, publisher).await;

        match &outcome {
            Ok(result) => publisher.publish(GenerationState::Completed(result.clone())),
            Err(e) => {
                warn!(error = %e.kind, "Generation failed");
                publisher.publish(GenerationState::Failed {
                    message: e.kind.to_string(),
                });
            }
        }
        outcome
    }

    async fn run(
        &self,
        params: &GenerationParams,
        overrides: &ParameterOverrides,
        cancel: &CancellationToken,
        state: StatePublisher<'_>,
    ) -> OrchestratorResult<GenerationResult> {
        state.publish(GenerationState::Validating);
        let settings = self.settings.current();
        let request = build_request(params, overrides, &settings)?;

        if cancel.is_cancelled() {
            return Err(PollError::new(PollErrorKind::Cancelled).into());
        }

        state.publish(GenerationState::Submitting);
        let handle = self.client.submit(&request).await?;
        let task_id = handle.task_id().clone();
        info!(
            task_id = %task_id,
            provider = self.client.provider_name(),
            "Submitted generation"
        );

        state.publish(GenerationState::Polling {
            task_id: task_id.clone(),
            status: TaskStatus::Pending,
            progress: None,
            polls: 0,
        });

        let result = self
            .poller
            .wait_with_progress(&task_id, params.modality, cancel, |snapshot, polls| {
                state.publish(GenerationState::Polling {
                    task_id: task_id.clone(),
                    status: snapshot.status,
                    progress: snapshot.progress,
                    polls,
                });
            })
            .await?;

        if result.is_success() && settings.save_history {
            self.save_history(&result, &request, params, &settings).await;
        } else {
            debug!(
                status = %result.status,
                save_history = settings.save_history,
                "Not recording generation"
            );
        }

        Ok(result)
    }

    async fn save_history(
        &self,
        result: &GenerationResult,
        request: &GenerationRequest,
        params: &GenerationParams,
        settings: &UserSettings,
    ) {
        let label = model_label(params, request);
        match self.recorder.record(result, request, &label).await {
            Ok(id) if settings.auto_download => self.schedule_download(id, result),
            Ok(_) => {}
            Err(e) => {
                warn!(task_id = %result.task_id, error = %e, "Failed to save generation history");
            }
        }
    }

    fn schedule_download(&self, id: i64, result: &GenerationResult) {
        let Some(archiver) = self.archiver.clone() else {
            debug!("Auto-download enabled but no archiver configured");
            return;
        };
        let Some(url) = result.media_url().map(str::to_string) else {
            return;
        };

        let recorder = self.recorder.clone();
        let modality = result.modality;
        let span = info_span!("download", id, task_id = %result.task_id);

        self.background.spawn(
            async move {
                let path = match archiver.archive(&url, modality).await {
                    Ok(path) => path,
                    Err(e) => {
                        warn!(error = %e, "Background download failed");
                        return;
                    }
                };

                let path = path.to_string_lossy();
                match recorder.attach_local_path(id, &path).await {
                    Ok(()) => info!(path = %path, "Downloaded generation result"),
                    Err(e) => warn!(error = %e, "Failed to record downloaded path"),
                }
            }
            .instrument(span),
        );
    }

    /// Wait for every scheduled background download to finish.
    pub async fn drain_background(&self) {
        self.background.close();
        self.background.wait().await;
        self.background.reopen();
    }
}
