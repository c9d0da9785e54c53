//! Handle to one running generation.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use vermeer_core::{GenerationResult, GenerationState};
use vermeer_error::{OrchestratorResult, PollError, PollErrorKind};

/// A generation started with
/// [`GenerationOrchestrator::start`](crate::GenerationOrchestrator::start).
///
/// Every handle owns its own state channel and cancellation token.
#[derive(Debug)]
pub struct GenerationHandle {
    state: watch::Receiver<GenerationState>,
    cancel: CancellationToken,
    task: JoinHandle<OrchestratorResult<GenerationResult>>,
}

impl GenerationHandle {
    pub(crate) fn new(
        state: watch::Receiver<GenerationState>,
        cancel: CancellationToken,
        task: JoinHandle<OrchestratorResult<GenerationResult>>,
    ) -> Self {
        Self {
            state,
            cancel,
            task,
        }
    }

    /// Receiver for state changes.
    pub fn state(&self) -> watch::Receiver<GenerationState> {
        self.state.clone()
    }

    /// Latest published state.
    pub fn current(&self) -> GenerationState {
        self.state.borrow().clone()
    }

    /// Stop observing the remote task.
    ///
    /// Takes effect at the next poll boundary. The remote task is not cancelled.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the generation to finish.
    ///
    /// # Errors
    ///
    /// Returns the generation's error. An aborted task reports `Cancelled`.
    pub async fn result(self) -> OrchestratorResult<GenerationResult> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(PollError::new(PollErrorKind::Cancelled).into()),
        }
    }
}
