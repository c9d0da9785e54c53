//! The normalized generation request.

use crate::{
    FALLBACK_CFG_SCALE, FALLBACK_HEIGHT, FALLBACK_IMAGE_COUNT, FALLBACK_MODEL_ID,
    FALLBACK_SAMPLER, FALLBACK_STEPS, FALLBACK_WIDTH, Modality, clamp_cfg_scale,
    clamp_dimension, clamp_image_count, clamp_steps, clamp_weight,
};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A named weighted adjustment layer (LoRA) applied to the base model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// Modifier name as the provider knows it
    pub name: String,
    /// Weight in `[0, 1]`
    pub weight: f32,
}

impl Modifier {
    /// Create a modifier, clamping the weight to `[0, 1]`.
    pub fn new(name: impl Into<String>, weight: f32) -> Self {
        Self {
            name: name.into(),
            weight: clamp_weight(weight),
        }
    }
}

/// Boolean generation switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GenerationFlags {
    /// Second high-resolution pass
    pub high_res_fix: bool,
    /// Face restoration pass
    pub face_restore: bool,
    /// NSFW content requested
    pub nsfw: bool,
}

/// Immutable, normalized request handed to the Generation Client.
///
/// Built once per invocation. [`GenerationRequestBuilder::build`] clamps the
/// numeric fields to their documented bounds.
///
/// # Examples
///
/// ```
/// use vermeer_core::{GenerationRequest, Modality};
///
/// let request = GenerationRequest::builder()
///     .prompt("A beautiful sunset")
///     .modality(Modality::TextToImage)
///     .width(3000u32)
///     .height(10u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.width(), 2048);
/// assert_eq!(*request.height(), 64);
/// assert_eq!(request.model_id(), "meinamix_v11");
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into), build_fn(private, name = "build_unclamped"))]
pub struct GenerationRequest {
    /// Positive prompt
    prompt: String,
    /// Negative prompt
    #[builder(default)]
    negative_prompt: Option<String>,
    /// Kind of generation
    #[builder(default)]
    modality: Modality,
    /// Output width in pixels
    #[builder(default = "FALLBACK_WIDTH")]
    width: u32,
    /// Output height in pixels
    #[builder(default = "FALLBACK_HEIGHT")]
    height: u32,
    /// Sampling steps
    #[builder(default = "FALLBACK_STEPS")]
    steps: u32,
    /// Classifier-free guidance scale
    #[builder(default = "FALLBACK_CFG_SCALE")]
    cfg_scale: f32,
    /// Sampler name
    #[builder(default = "FALLBACK_SAMPLER.to_string()")]
    sampler: String,
    /// Seed, absent for a provider-assigned random seed
    #[builder(default)]
    seed: Option<i64>,
    /// Base model identifier
    #[builder(default = "FALLBACK_MODEL_ID.to_string()")]
    model_id: String,
    /// Companion VAE identifier
    #[builder(default)]
    vae_id: Option<String>,
    /// Profile the model and VAE came from
    #[builder(default)]
    profile_id: Option<String>,
    /// Images per task
    #[builder(default = "FALLBACK_IMAGE_COUNT")]
    image_count: u32,
    /// Weighted modifiers
    #[builder(default)]
    modifiers: Vec<Modifier>,
    /// Generation switches
    #[builder(default)]
    flags: GenerationFlags,
    /// Source image bytes for image-conditioned modalities
    #[builder(default)]
    source_image: Option<Vec<u8>>,
    /// Mask image bytes for inpainting
    #[builder(default)]
    mask_image: Option<Vec<u8>>,
}

impl GenerationRequest {
    /// Creates a new builder for `GenerationRequest`.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }
}

impl GenerationRequestBuilder {
    /// Build the request, clamping numeric fields to their bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if `prompt` was never set.
    pub fn build(&self) -> Result<GenerationRequest, GenerationRequestBuilderError> {
        let mut request = self.build_unclamped()?;
        request.width = clamp_dimension(request.width);
        request.height = clamp_dimension(request.height);
        request.steps = clamp_steps(request.steps);
        request.cfg_scale = clamp_cfg_scale(request.cfg_scale);
        request.image_count = clamp_image_count(request.image_count);
        for modifier in &mut request.modifiers {
            modifier.weight = clamp_weight(modifier.weight);
        }
        Ok(request)
    }
}
