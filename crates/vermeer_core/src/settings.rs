//! User-editable settings.

use crate::{clamp_cfg_scale, clamp_dimension, clamp_steps};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Minimum length of a plausible API key.
pub const API_KEY_MIN_LENGTH: usize = 10;

/// Process-wide user settings.
///
/// Stored defaults are optional; an unset default falls through to the
/// hard-coded fallback at resolution time.
///
/// # Examples
///
/// ```
/// use vermeer_core::UserSettings;
///
/// let settings = UserSettings::default()
///     .with_default_width(Some(3000))
///     .with_default_steps(Some(0))
///     .clamped();
///
/// assert_eq!(settings.default_width, Some(2048));
/// assert_eq!(settings.default_steps, Some(1));
/// assert!(settings.save_history);
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct UserSettings {
    /// Provider API credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Default model identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model_id: Option<String>,
    /// Default sampler name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sampler: Option<String>,
    /// Default width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_width: Option<u32>,
    /// Default height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_height: Option<u32>,
    /// Default sampling steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_steps: Option<u32>,
    /// Default guidance scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_cfg_scale: Option<f32>,
    /// Record successful generations in history
    pub save_history: bool,
    /// Download results to local storage after recording them
    pub auto_download: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model_id: None,
            default_sampler: None,
            default_width: None,
            default_height: None,
            default_steps: None,
            default_cfg_scale: None,
            save_history: true,
            auto_download: false,
        }
    }
}

impl UserSettings {
    /// Clamp numeric defaults to their bounds and drop blank strings.
    pub fn clamped(mut self) -> Self {
        self.default_width = self.default_width.map(clamp_dimension);
        self.default_height = self.default_height.map(clamp_dimension);
        self.default_steps = self.default_steps.map(clamp_steps);
        self.default_cfg_scale = self.default_cfg_scale.map(clamp_cfg_scale);
        self.api_key = non_blank(self.api_key);
        self.default_model_id = non_blank(self.default_model_id);
        self.default_sampler = non_blank(self.default_sampler);
        self
    }

    /// Whether an API key that passes local validation is stored.
    pub fn has_valid_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty() && key.trim().len() >= API_KEY_MIN_LENGTH)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl std::fmt::Debug for UserSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_model_id", &self.default_model_id)
            .field("default_sampler", &self.default_sampler)
            .field("default_width", &self.default_width)
            .field("default_height", &self.default_height)
            .field("default_steps", &self.default_steps)
            .field("default_cfg_scale", &self.default_cfg_scale)
            .field("save_history", &self.save_history)
            .field("auto_download", &self.auto_download)
            .finish()
    }
}
