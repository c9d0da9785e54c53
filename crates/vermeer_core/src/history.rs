//! Durable records of past generations.

use crate::{GenerationFlags, Modality};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored generation.
///
/// Immutable after creation except for `local_path`, which is filled in once a
/// background download completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Store-assigned, monotonically increasing identifier
    pub id: i64,
    /// Provider task identifier
    pub task_id: String,
    /// Kind of generation
    pub modality: Modality,
    /// Positive prompt
    pub prompt: String,
    /// Negative prompt
    pub negative_prompt: Option<String>,
    /// Preview URL
    pub thumbnail_url: String,
    /// Full result URL
    pub result_url: Option<String>,
    /// Downloaded copy on local disk
    pub local_path: Option<String>,
    /// Model or profile display name
    pub model_name: String,
    /// Sampler used
    pub sampler: Option<String>,
    /// Steps used
    pub steps: Option<u32>,
    /// Guidance scale used
    pub cfg_scale: Option<f32>,
    /// Seed used, if fixed
    pub seed: Option<i64>,
    /// Images requested
    pub image_count: u32,
    /// Switches used
    pub flags: GenerationFlags,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// A generation about to be stored; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryItem {
    /// Provider task identifier
    pub task_id: String,
    /// Kind of generation
    pub modality: Modality,
    /// Positive prompt
    pub prompt: String,
    /// Negative prompt
    pub negative_prompt: Option<String>,
    /// Preview URL
    pub thumbnail_url: String,
    /// Full result URL
    pub result_url: Option<String>,
    /// Model or profile display name
    pub model_name: String,
    /// Sampler used
    pub sampler: Option<String>,
    /// Steps used
    pub steps: Option<u32>,
    /// Guidance scale used
    pub cfg_scale: Option<f32>,
    /// Seed used, if fixed
    pub seed: Option<i64>,
    /// Images requested
    pub image_count: u32,
    /// Switches used
    pub flags: GenerationFlags,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl NewHistoryItem {
    /// Minimal record for tests and imports.
    pub fn new(task_id: impl Into<String>, modality: Modality, prompt: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            modality,
            prompt: prompt.into(),
            negative_prompt: None,
            thumbnail_url: String::new(),
            result_url: None,
            model_name: String::new(),
            sampler: None,
            steps: None,
            cfg_scale: None,
            seed: None,
            image_count: 1,
            flags: GenerationFlags::default(),
            created_at: Utc::now(),
        }
    }
}
