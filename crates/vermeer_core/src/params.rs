//! Caller-supplied parameters and their resolution rules.

use crate::{GenerationFlags, HistoryItem, Modality, ModelProfile, Modifier};
use derive_setters::Setters;

/// Fallback model identifier.
pub const FALLBACK_MODEL_ID: &str = "meinamix_v11";
/// Fallback sampler name.
pub const FALLBACK_SAMPLER: &str = "Euler a";
/// Fallback width.
pub const FALLBACK_WIDTH: u32 = 512;
/// Fallback height.
pub const FALLBACK_HEIGHT: u32 = 768;
/// Fallback sampling steps.
pub const FALLBACK_STEPS: u32 = 25;
/// Fallback guidance scale.
pub const FALLBACK_CFG_SCALE: f32 = 7.0;
/// Fallback images per task.
pub const FALLBACK_IMAGE_COUNT: u32 = 1;

/// Pick the explicit override, else the stored default, else the fallback.
///
/// Applied independently to every field.
///
/// # Examples
///
/// ```
/// use vermeer_core::resolve;
///
/// assert_eq!(resolve(Some(1024), Some(768), 512), 1024);
/// assert_eq!(resolve(None, Some(768), 512), 768);
/// assert_eq!(resolve(None, None, 512), 512);
/// ```
pub fn resolve<T>(explicit: Option<T>, stored: Option<T>, fallback: T) -> T {
    explicit.or(stored).unwrap_or(fallback)
}

/// What the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct GenerationParams {
    /// Positive prompt, must not be blank
    pub prompt: String,
    /// Negative prompt
    pub negative_prompt: Option<String>,
    /// Kind of generation
    pub modality: Modality,
    /// Source image bytes
    pub source_image: Option<Vec<u8>>,
    /// Mask image bytes
    pub mask_image: Option<Vec<u8>>,
    /// Switches
    pub flags: GenerationFlags,
    /// Selected profile
    pub profile: Option<ModelProfile>,
    /// Weighted modifiers
    pub modifiers: Vec<Modifier>,
}

impl GenerationParams {
    /// Text-to-image parameters for a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// Per-request overrides of stored defaults.
#[derive(Debug, Clone, Default, PartialEq, Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct ParameterOverrides {
    /// Width override
    pub width: Option<u32>,
    /// Height override
    pub height: Option<u32>,
    /// Steps override
    pub steps: Option<u32>,
    /// Guidance scale override
    pub cfg_scale: Option<f32>,
    /// Sampler override
    pub sampler: Option<String>,
    /// Fixed seed
    pub seed: Option<i64>,
    /// Model override, ignored when a profile is selected
    pub model_id: Option<String>,
    /// Image count override
    pub image_count: Option<u32>,
}

/// A past generation packaged for resubmission.
///
/// Passed explicitly to the next generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct RemixPayload {
    /// Parameters recovered from the record
    pub params: GenerationParams,
    /// Overrides recovered from the record
    pub overrides: ParameterOverrides,
}

impl RemixPayload {
    /// Rebuild parameters from a history record.
    ///
    /// A record whose model name matches a built-in profile's display name
    /// selects that profile again; any other name is used as the model id.
    /// Image-conditioned remixes still need fresh source bytes.
    pub fn from_history(item: &HistoryItem) -> Self {
        let profile = ModelProfile::defaults()
            .into_iter()
            .find(|p| p.name() == &item.model_name);

        let model_id = match profile {
            Some(_) => None,
            None if item.model_name.is_empty() => None,
            None => Some(item.model_name.clone()),
        };

        let params = GenerationParams {
            prompt: item.prompt.clone(),
            negative_prompt: item.negative_prompt.clone(),
            modality: item.modality,
            source_image: None,
            mask_image: None,
            flags: item.flags,
            profile,
            modifiers: Vec::new(),
        };

        let overrides = ParameterOverrides {
            width: None,
            height: None,
            steps: item.steps,
            cfg_scale: item.cfg_scale,
            sampler: item.sampler.clone(),
            seed: item.seed,
            model_id,
            image_count: Some(item.image_count),
        };

        Self { params, overrides }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(model_name: &str) -> HistoryItem {
        HistoryItem {
            id: 7,
            task_id: "task_1".to_string(),
            modality: Modality::TextToImage,
            prompt: "a lighthouse".to_string(),
            negative_prompt: Some("blurry".to_string()),
            thumbnail_url: "https://x/1.png".to_string(),
            result_url: Some("https://x/1.png".to_string()),
            local_path: None,
            model_name: model_name.to_string(),
            sampler: Some("DPM++ SDE Karras".to_string()),
            steps: Some(30),
            cfg_scale: Some(6.5),
            seed: Some(42),
            image_count: 2,
            flags: GenerationFlags {
                high_res_fix: true,
                face_restore: false,
                nsfw: false,
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_is_per_field() {
        let width = resolve(Some(1024), None, 512);
        let height = resolve(None, Some(640), 768);
        let steps = resolve(None, None, 25);
        assert_eq!((width, height, steps), (1024, 640, 25));
    }

    #[test]
    fn test_remix_with_plain_model() {
        let remix = RemixPayload::from_history(&item("anylorav15"));
        assert_eq!(remix.params.prompt, "a lighthouse");
        assert!(remix.params.profile.is_none());
        assert!(remix.params.flags.high_res_fix);
        assert_eq!(remix.overrides.model_id.as_deref(), Some("anylorav15"));
        assert_eq!(remix.overrides.seed, Some(42));
        assert_eq!(remix.overrides.image_count, Some(2));
    }

    #[test]
    fn test_remix_restores_profile() {
        let remix = RemixPayload::from_history(&item("Cinematic Realism (Model + VAE)"));
        let profile = remix.params.profile.unwrap();
        assert_eq!(profile.id(), "cinematic_realism");
        assert!(remix.overrides.model_id.is_none());
    }

    #[test]
    fn test_setters_strip_option() {
        let params = GenerationParams::new("x")
            .with_negative_prompt("y".to_string())
            .with_modality(Modality::Upscale);
        assert_eq!(params.negative_prompt.as_deref(), Some("y"));
        let overrides = ParameterOverrides::default().with_width(1024);
        assert_eq!(overrides.width, Some(1024));
    }
}
