//! Observable generation state for presentation layers.

use crate::{GenerationResult, TaskStatus};
use serde::{Deserialize, Serialize};

/// Where one generation currently stands.
///
/// Interim `Polling` states are progress, not errors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationState {
    /// Nothing started
    #[default]
    #[display("idle")]
    Idle,
    /// Checking input and resolving settings
    #[display("validating")]
    Validating,
    /// Submission in flight
    #[display("submitting")]
    Submitting,
    /// Waiting for a terminal status
    #[display("{} {}", task_id, status)]
    Polling {
        /// Task identifier
        task_id: String,
        /// Last observed status
        status: TaskStatus,
        /// Last reported progress
        progress: Option<f32>,
        /// Fetches issued so far
        polls: usize,
    },
    /// Terminal result obtained
    #[display("completed")]
    Completed(GenerationResult),
    /// Generation failed before a terminal result
    #[display("failed: {}", message)]
    Failed {
        /// Human-readable reason
        message: String,
    },
}

impl GenerationState {
    /// Whether no further updates will follow.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            GenerationState::Completed(_) | GenerationState::Failed { .. }
        )
    }
}
