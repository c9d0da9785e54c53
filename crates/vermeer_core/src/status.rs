//! Task status and the provider status lookup.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a remote generation task.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Accepted, not yet running
    #[default]
    Pending,
    /// Running on the provider
    Processing,
    /// Finished with media
    Success,
    /// Finished with an error
    Failed,
    /// Cancelled on the provider side
    Cancelled,
}

/// Provider spellings, compared case-insensitively after trimming.
const PROVIDER_STATUSES: &[(&str, TaskStatus)] = &[
    ("PENDING", TaskStatus::Pending),
    ("QUEUE", TaskStatus::Pending),
    ("QUEUED", TaskStatus::Pending),
    ("TASK_STATUS_QUEUED", TaskStatus::Pending),
    ("PROCESSING", TaskStatus::Processing),
    ("RUNNING", TaskStatus::Processing),
    ("TASK_STATUS_PROCESSING", TaskStatus::Processing),
    ("SUCCESS", TaskStatus::Success),
    ("SUCCEEDED", TaskStatus::Success),
    ("SUCCEED", TaskStatus::Success),
    ("DONE", TaskStatus::Success),
    ("TASK_STATUS_SUCCEED", TaskStatus::Success),
    ("FAILED", TaskStatus::Failed),
    ("ERROR", TaskStatus::Failed),
    ("TASK_STATUS_FAILED", TaskStatus::Failed),
    ("CANCELLED", TaskStatus::Cancelled),
    ("CANCELED", TaskStatus::Cancelled),
    ("CANCEL", TaskStatus::Cancelled),
];

impl TaskStatus {
    /// Map a provider status string to a status.
    ///
    /// Unrecognized strings map to [`TaskStatus::Pending`] so that a status the
    /// provider introduces later keeps the poll loop running instead of ending it.
    ///
    /// # Examples
    ///
    /// ```
    /// use vermeer_core::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::from_provider("done"), TaskStatus::Success);
    /// assert_eq!(TaskStatus::from_provider("QUEUE"), TaskStatus::Pending);
    /// assert_eq!(TaskStatus::from_provider("WEIRD_NEW_STATE"), TaskStatus::Pending);
    /// ```
    pub fn from_provider(raw: &str) -> Self {
        let raw = raw.trim();
        PROVIDER_STATUSES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(raw))
            .map(|(_, status)| *status)
            .unwrap_or(TaskStatus::Pending)
    }

    /// Whether no further polling occurs in this status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Success | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_synonyms() {
        assert_eq!(TaskStatus::from_provider("QUEUE"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_provider("running"), TaskStatus::Processing);
        assert_eq!(TaskStatus::from_provider("Done"), TaskStatus::Success);
        assert_eq!(TaskStatus::from_provider("ERROR"), TaskStatus::Failed);
        assert_eq!(TaskStatus::from_provider("cancel"), TaskStatus::Cancelled);
        assert_eq!(
            TaskStatus::from_provider("TASK_STATUS_SUCCEED"),
            TaskStatus::Success
        );
        assert_eq!(TaskStatus::from_provider("  failed \n"), TaskStatus::Failed);
    }

    #[test]
    fn test_unknown_is_pending_and_not_terminal() {
        for raw in ["WEIRD_NEW_STATE", "", "paused", "42"] {
            let status = TaskStatus::from_provider(raw);
            assert_eq!(status, TaskStatus::Pending);
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn test_canonical_names_map_to_themselves() {
        for status in TaskStatus::iter() {
            assert_eq!(TaskStatus::from_provider(&status.to_string()), status);
        }
    }

    #[test]
    fn test_terminal_set() {
        let terminal: Vec<_> = TaskStatus::iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(
            terminal,
            vec![TaskStatus::Success, TaskStatus::Failed, TaskStatus::Cancelled]
        );
    }
}
