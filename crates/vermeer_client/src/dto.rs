//! Wire data transfer objects for the async task API.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Weighted LoRA entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraDto {
    /// LoRA name
    pub name: String,
    /// Strength in `[0, 1]`
    pub weight: f32,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Body of every `POST v3/async/*` submission.
///
/// One shape covers all modalities; fields a modality does not use stay
/// `None` and are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into, strip_option))]
pub struct TaskRequestBody {
    /// Base model identifier
    model_name: String,
    /// Positive prompt
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    /// Negative prompt
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,
    /// Output width
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    /// Output height
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    /// Images per task
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    image_num: Option<u32>,
    /// Sampling steps
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<u32>,
    /// Guidance scale
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    cfg_scale: Option<f32>,
    /// Seed
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    /// Sampler
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    sampler_name: Option<String>,
    /// Companion VAE
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    vae: Option<String>,
    /// LoRA modifiers
    #[builder(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    loras: Vec<LoraDto>,
    /// High-resolution fix pass
    #[builder(default)]
    #[serde(skip_serializing_if = "is_false")]
    enable_hr: bool,
    /// Face restoration pass
    #[builder(default)]
    #[serde(skip_serializing_if = "is_false")]
    restore_faces: bool,
    /// NSFW content permitted
    #[builder(default)]
    #[serde(skip_serializing_if = "is_false")]
    nsfw: bool,
    /// Base64 source images (img2img)
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
    /// Base64 source image
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    /// Base64 mask image
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    mask_image: Option<String>,
    /// How far img2img departs from the source
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    denoising_strength: Option<f32>,
    /// Video frames
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    video_length: Option<u32>,
    /// Video frame rate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    fps: Option<u32>,
    /// Upscale factor
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<u32>,
    /// Mask feathering radius
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    mask_blur: Option<u32>,
}

impl TaskRequestBody {
    /// Creates a new builder for `TaskRequestBody`.
    pub fn builder() -> TaskRequestBodyBuilder {
        TaskRequestBodyBuilder::default()
    }
}

/// `data` payload of a submission response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskIdDto {
    /// Provider task identifier
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Submission response, accepting the id wrapped in `data` or at top level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    /// Wrapped payload
    #[serde(default)]
    pub data: Option<TaskIdDto>,
    /// Top-level id
    #[serde(default)]
    pub task_id: Option<String>,
    /// Provider message
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmitResponse {
    /// The task id, wherever it was found.
    pub fn task_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.task_id.as_deref())
            .or(self.task_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }
}

/// A result media entry: a bare URL or an object carrying one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MediaEntryDto {
    /// Bare URL string
    Url(String),
    /// Object form
    Object {
        /// Image URL
        #[serde(default)]
        image_url: Option<String>,
        /// Video URL
        #[serde(default)]
        video_url: Option<String>,
        /// Generic URL
        #[serde(default)]
        url: Option<String>,
    },
}

impl MediaEntryDto {
    /// The URL this entry points at.
    pub fn url(&self) -> Option<&str> {
        let url = match self {
            MediaEntryDto::Url(url) => Some(url.as_str()),
            MediaEntryDto::Object {
                image_url,
                video_url,
                url,
            } => image_url
                .as_deref()
                .or(video_url.as_deref())
                .or(url.as_deref()),
        };
        url.filter(|u| !u.trim().is_empty())
    }
}

/// `result` object of a status response.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TaskResultDto {
    /// Image entries
    #[serde(default)]
    pub images: Vec<MediaEntryDto>,
    /// Video entries
    #[serde(default)]
    pub videos: Vec<MediaEntryDto>,
    /// Single image
    #[serde(default)]
    pub image: Option<MediaEntryDto>,
    /// Single video
    #[serde(default)]
    pub video: Option<MediaEntryDto>,
}

/// `error` field of a status response.
///
/// Unrecognised shapes land in `Other` so a strange error payload never
/// hides the task status.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TaskErrorDto {
    /// Plain message
    Text(String),
    /// Structured error
    Detail {
        /// Message
        #[serde(default)]
        message: Option<String>,
        /// Provider error code, string or number
        #[serde(default)]
        code: Option<Value>,
    },
    /// Anything else
    Other(Value),
}

impl TaskErrorDto {
    /// Human-readable message, falling back to the code.
    pub fn message(&self) -> Option<String> {
        let message = match self {
            TaskErrorDto::Text(text) => Some(text.clone()),
            TaskErrorDto::Detail { message, code } => {
                message.clone().or_else(|| code.as_ref().and_then(render_code))
            }
            TaskErrorDto::Other(_) => None,
        };
        message.filter(|m| !m.trim().is_empty())
    }
}

fn render_code(code: &Value) -> Option<String> {
    match code {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Nested `task` object used by newer responses.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TaskInfoDto {
    /// Task id
    #[serde(default)]
    pub task_id: Option<String>,
    /// Raw status
    #[serde(default)]
    pub status: Option<String>,
    /// Progress in percent
    #[serde(default)]
    pub progress_percent: Option<f32>,
    /// Failure reason
    #[serde(default)]
    pub reason: Option<String>,
}

/// Status payload, tolerant of the flat and nested layouts.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TaskStatusDto {
    /// Task id
    #[serde(default)]
    pub task_id: Option<String>,
    /// Raw status
    #[serde(default)]
    pub status: Option<String>,
    /// Progress as a fraction or percentage
    #[serde(default)]
    pub progress: Option<f32>,
    /// Result media
    #[serde(default)]
    pub result: Option<TaskResultDto>,
    /// Error details
    #[serde(default)]
    pub error: Option<TaskErrorDto>,
    /// Nested task info
    #[serde(default)]
    pub task: Option<TaskInfoDto>,
    /// Top-level image entries
    #[serde(default)]
    pub images: Vec<MediaEntryDto>,
    /// Top-level video entries
    #[serde(default)]
    pub videos: Vec<MediaEntryDto>,
}

/// Entry of `GET v4/models`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfoDto {
    /// Model identifier
    pub name: String,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Model type
    #[serde(default, rename = "type")]
    pub model_type: Option<String>,
    /// NSFW capable
    #[serde(default)]
    pub is_nsfw: Option<bool>,
    /// Recommended by the provider
    #[serde(default)]
    pub is_recommended: Option<bool>,
}
