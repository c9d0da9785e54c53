//! Polling a remote task until it reaches a terminal state.

use chrono::Utc;
use derive_setters::Setters;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use vermeer_core::{GenerationResult, Modality, TaskSnapshot};
use vermeer_error::{PollError, PollErrorKind, PollResult};
use vermeer_interface::GenerationClient;
use vermeer_settings::PollingConfig;

/// Interval between status fetches and the total wait budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Setters)]
#[setters(prefix = "with_")]
pub struct PollConfig {
    /// Delay after a non-terminal snapshot
    pub interval: Duration,
    /// No fetch is issued at or past this much elapsed time
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from(PollingConfig::default())
    }
}

impl From<PollingConfig> for PollConfig {
    fn from(config: PollingConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            max_wait: Duration::from_millis(config.max_wait_ms),
        }
    }
}

/// Waits for one task to finish.
///
/// Each fetch is a single call with no retry: any fetch error ends the wait
/// as [`PollErrorKind::Upstream`]. Cancellation is observed between polls
/// and during the inter-poll sleep, never in the middle of a fetch, and
/// only stops local observation; the remote task keeps running.
#[derive(Clone)]
pub struct TaskPoller {
    client: Arc<dyn GenerationClient>,
    config: PollConfig,
}

impl std::fmt::Debug for TaskPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPoller")
            .field("provider", &self.client.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

impl TaskPoller {
    /// Poller over `client`.
    pub fn new(client: Arc<dyn GenerationClient>, config: PollConfig) -> Self {
        Self { client, config }
    }

    /// Current timing configuration.
    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Wait for `task_id` to reach a terminal state.
    ///
    /// # Errors
    ///
    /// - [`PollErrorKind::Upstream`] if a fetch fails
    /// - [`PollErrorKind::Timeout`] if the wait budget runs out
    /// - [`PollErrorKind::Cancelled`] if `cancel` fires first
    pub async fn wait_for_terminal(
        &self,
        task_id: &str,
        modality: Modality,
        cancel: &CancellationToken,
    ) -> PollResult<GenerationResult> {
        self.wait_with_progress(task_id, modality, cancel, |_, _| {})
            .await
    }

    /// Like [`wait_for_terminal`](Self::wait_for_terminal), calling
    /// `on_snapshot` with every fetched snapshot and the poll count so far.
    #[instrument(skip(self, cancel, on_snapshot), fields(modality = %modality))]
    pub async fn wait_with_progress<F>(
        &self,
        task_id: &str,
        modality: Modality,
        cancel: &CancellationToken,
        mut on_snapshot: F,
    ) -> PollResult<GenerationResult>
    where
        F: FnMut(&TaskSnapshot, usize) + Send,
    {
        let started = Instant::now();
        let mut polls = 0usize;

        loop {
            if cancel.is_cancelled() {
                info!(polls, "Stopped waiting for task");
                return Err(PollError::new(PollErrorKind::Cancelled));
            }

            let elapsed = started.elapsed();
            if elapsed >= self.config.max_wait {
                let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                warn!(polls, elapsed_ms, "Task did not finish in time");
                return Err(PollError::new(PollErrorKind::Timeout { elapsed_ms, polls }));
            }

            polls += 1;
            let snapshot = self.client.fetch_status(task_id).await.map_err(|e| {
                warn!(poll = polls, error = %e, "Status fetch failed");
                PollError::from(e)
            })?;

            debug!(
                poll = polls,
                status = %snapshot.status,
                progress = ?snapshot.progress,
                "Polled task"
            );
            on_snapshot(&snapshot, polls);

            // A terminal answer wins even if cancellation arrived mid-fetch
            if let Some(result) = GenerationResult::from_terminal(&snapshot, modality, Utc::now())
            {
                info!(polls, status = %result.status, "Task reached terminal state");
                return Ok(result);
            }

            // Never sleep past the wait budget
            let remaining = self.config.max_wait.saturating_sub(started.elapsed());
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(polls, "Stopped waiting for task");
                    return Err(PollError::new(PollErrorKind::Cancelled));
                }
                _ = tokio::time::sleep(self.config.interval.min(remaining)) => {}
            }
        }
    }
}
