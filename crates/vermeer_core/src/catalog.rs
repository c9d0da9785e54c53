//! Model catalog entries and named model profiles.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Broad family of a provider model.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "snake_case")]
pub enum ModelType {
    /// Text or image to still image
    ImageGeneration,
    /// Text or image to video
    VideoGeneration,
    /// Super-resolution
    Upscaling,
    /// Masked editing
    Inpainting,
    /// Structure-guided generation
    ControlNet,
}

impl ModelType {
    /// Map the provider's model `type` field.
    ///
    /// Missing or unknown values are treated as image generation.
    pub fn from_provider(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("text-to-video") | Some("txt2video") | Some("img2video") => {
                ModelType::VideoGeneration
            }
            Some("upscale") => ModelType::Upscaling,
            Some("inpainting") => ModelType::Inpainting,
            Some("controlnet") => ModelType::ControlNet,
            _ => ModelType::ImageGeneration,
        }
    }
}

/// A model offered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiModel {
    /// Identifier sent as `model_name`
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Model family
    pub model_type: ModelType,
    /// Whether the model may produce NSFW output
    pub is_nsfw: bool,
    /// Whether the provider recommends the model
    pub is_recommended: bool,
}

impl AiModel {
    fn entry(
        name: &str,
        display_name: &str,
        model_type: ModelType,
        is_nsfw: bool,
        is_recommended: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            model_type,
            is_nsfw,
            is_recommended,
        }
    }

    /// Built-in catalog used when the provider's model list is unavailable.
    pub fn fallback_catalog() -> Vec<AiModel> {
        vec![
            Self::entry("meinamix_v11", "MeinaMix V11", ModelType::ImageGeneration, true, true),
            Self::entry("anylorav15", "AnyLora V1.5", ModelType::ImageGeneration, true, true),
            Self::entry(
                "revAnimated_v122",
                "Rev Animated V1.2.2",
                ModelType::ImageGeneration,
                false,
                true,
            ),
            Self::entry("dreamshaper_8", "DreamShaper 8", ModelType::ImageGeneration, false, true),
            Self::entry(
                "realisticVision_v51",
                "Realistic Vision V5.1",
                ModelType::ImageGeneration,
                false,
                false,
            ),
            Self::entry(
                "stableDiffusionXL",
                "Stable Diffusion XL",
                ModelType::ImageGeneration,
                false,
                false,
            ),
            Self::entry(
                "stableVideoDiffusion",
                "Stable Video Diffusion",
                ModelType::VideoGeneration,
                false,
                false,
            ),
        ]
    }
}

/// Stylistic or content capability of a profile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "snake_case")]
pub enum ModelCapability {
    /// Photographic output
    Realistic,
    /// Tuned for people
    Portrait,
    /// Permits adult content
    Nsfw,
}

/// Named bundle of base model, companion VAE and content policy.
///
/// # Examples
///
/// ```
/// use vermeer_core::ModelProfile;
///
/// let profile = ModelProfile::find("nsfw_realism").unwrap();
/// assert!(*profile.nsfw_allowed());
/// assert_eq!(profile.model_id(), "realistic_vision_v6");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ModelProfile {
    /// Stable identifier
    id: String,
    /// Display name, recorded in history as the model name
    name: String,
    /// Base model identifier
    model_id: String,
    /// Companion VAE identifier
    #[builder(default)]
    vae_id: Option<String>,
    /// Model family
    #[builder(default = "ModelType::ImageGeneration")]
    model_type: ModelType,
    /// Capabilities
    #[builder(default)]
    capabilities: Vec<ModelCapability>,
    /// Whether NSFW requests are permitted with this profile
    #[builder(default)]
    nsfw_allowed: bool,
}

impl ModelProfile {
    /// Creates a new builder for `ModelProfile`.
    pub fn builder() -> ModelProfileBuilder {
        ModelProfileBuilder::default()
    }

    /// Built-in profiles.
    pub fn defaults() -> Vec<ModelProfile> {
        vec![
            ModelProfile {
                id: "realism_base".to_string(),
                name: "Realism Base (Model + VAE)".to_string(),
                model_id: "meinamix_v11".to_string(),
                vae_id: Some("vae-clear".to_string()),
                model_type: ModelType::ImageGeneration,
                capabilities: vec![ModelCapability::Realistic, ModelCapability::Portrait],
                nsfw_allowed: false,
            },
            ModelProfile {
                id: "cinematic_realism".to_string(),
                name: "Cinematic Realism (Model + VAE)".to_string(),
                model_id: "dreamshaper_v8".to_string(),
                vae_id: Some("vae-clarity".to_string()),
                model_type: ModelType::ImageGeneration,
                capabilities: vec![ModelCapability::Realistic],
                nsfw_allowed: false,
            },
            ModelProfile {
                id: "nsfw_realism".to_string(),
                name: "NSFW Realism (Model + VAE)".to_string(),
                model_id: "realistic_vision_v6".to_string(),
                vae_id: Some("vae-nsfw".to_string()),
                model_type: ModelType::ImageGeneration,
                capabilities: vec![ModelCapability::Realistic, ModelCapability::Nsfw],
                nsfw_allowed: true,
            },
        ]
    }

    /// Look up a built-in profile by id.
    pub fn find(id: &str) -> Option<ModelProfile> {
        Self::defaults().into_iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_nsfw_profile_allows_nsfw() {
        let allowed: Vec<_> = ModelProfile::defaults()
            .into_iter()
            .filter(|p| p.nsfw_allowed)
            .map(|p| p.id)
            .collect();
        assert_eq!(allowed, vec!["nsfw_realism".to_string()]);
    }

    #[test]
    fn test_model_type_mapping() {
        assert_eq!(ModelType::from_provider(Some("txt2img")), ModelType::ImageGeneration);
        assert_eq!(ModelType::from_provider(Some("Text-To-Video")), ModelType::VideoGeneration);
        assert_eq!(ModelType::from_provider(Some("upscale")), ModelType::Upscaling);
        assert_eq!(ModelType::from_provider(None), ModelType::ImageGeneration);
    }

    #[test]
    fn test_builder_defaults() {
        let profile = ModelProfile::builder()
            .id("custom")
            .name("Custom")
            .model_id("anylorav15")
            .build()
            .unwrap();
        assert!(!profile.nsfw_allowed());
        assert!(profile.vae_id().is_none());
    }
}
