//! Validation and parameter resolution before submission.

use vermeer_core::{
    FALLBACK_CFG_SCALE, FALLBACK_HEIGHT, FALLBACK_IMAGE_COUNT, FALLBACK_MODEL_ID,
    FALLBACK_SAMPLER, FALLBACK_STEPS, FALLBACK_WIDTH, GenerationParams, GenerationRequest,
    ParameterOverrides, UserSettings, resolve,
};
use vermeer_error::{OrchestratorError, OrchestratorErrorKind, OrchestratorResult};

/// Validate `params` and merge overrides, stored defaults and fallbacks.
///
/// Each numeric field resolves independently (explicit override, then stored
/// default, then fallback) and is clamped by the request builder. A selected
/// profile supplies the model and VAE, taking precedence over a model override.
///
/// # Errors
///
/// - `InvalidInput` for a blank prompt or missing source/mask image
/// - `PolicyViolation` when NSFW is requested with a profile that disallows it
pub fn build_request(
    params: &GenerationParams,
    overrides: &ParameterOverrides,
    settings: &UserSettings,
) -> OrchestratorResult<GenerationRequest> {
    if params.prompt.trim().is_empty() {
        return Err(OrchestratorError::invalid_input("prompt required"));
    }

    let modality = params.modality;
    if modality.requires_source_image() && params.source_image.as_ref().is_none_or(Vec::is_empty)
    {
        return Err(OrchestratorError::invalid_input(format!(
            "{} requires a source image",
            modality
        )));
    }
    if modality.requires_mask() && params.mask_image.as_ref().is_none_or(Vec::is_empty) {
        return Err(OrchestratorError::invalid_input(format!(
            "{} requires a mask image",
            modality
        )));
    }

    if let Some(profile) = params
        .profile
        .as_ref()
        .filter(|p| params.flags.nsfw && !*p.nsfw_allowed())
    {
        return Err(OrchestratorError::new(
            OrchestratorErrorKind::PolicyViolation(format!(
                "profile '{}' does not allow NSFW content",
                profile.id()
            )),
        ));
    }

    let model_id = match &params.profile {
        Some(profile) => profile.model_id().clone(),
        None => resolve(
            overrides.model_id.clone(),
            settings.default_model_id.clone(),
            FALLBACK_MODEL_ID.to_string(),
        ),
    };

    let negative_prompt = params
        .negative_prompt
        .clone()
        .filter(|n| !n.trim().is_empty());

    GenerationRequest::builder()
        .prompt(params.prompt.trim())
        .negative_prompt(negative_prompt)
        .modality(modality)
        .width(resolve(overrides.width, settings.default_width, FALLBACK_WIDTH))
        .height(resolve(overrides.height, settings.default_height, FALLBACK_HEIGHT))
        .steps(resolve(overrides.steps, settings.default_steps, FALLBACK_STEPS))
        .cfg_scale(resolve(
            overrides.cfg_scale,
            settings.default_cfg_scale,
            FALLBACK_CFG_SCALE,
        ))
        .sampler(resolve(
            overrides.sampler.clone(),
            settings.default_sampler.clone(),
            FALLBACK_SAMPLER.to_string(),
        ))
        .seed(overrides.seed)
        .model_id(model_id)
        .vae_id(params.profile.as_ref().and_then(|p| p.vae_id().clone()))
        .profile_id(params.profile.as_ref().map(|p| p.id().clone()))
        .image_count(resolve(overrides.image_count, None, FALLBACK_IMAGE_COUNT))
        .modifiers(params.modifiers.clone())
        .flags(params.flags)
        .source_image(params.source_image.clone())
        .mask_image(params.mask_image.clone())
        .build()
        .map_err(|e| OrchestratorError::invalid_input(e.to_string()))
}

/// Name recorded in history: the profile's display name, else the model id.
pub fn model_label(params: &GenerationParams, request: &GenerationRequest) -> String {
    params
        .profile
        .as_ref()
        .map(|p| p.name().clone())
        .unwrap_or_else(|| request.model_id().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vermeer_core::{Modality, ModelProfile};

    fn kind(err: OrchestratorError) -> OrchestratorErrorKind {
        err.kind
    }

    #[test]
    fn test_blank_prompt_rejected() {
        let err = build_request(
            &GenerationParams::new("   "),
            &ParameterOverrides::default(),
            &UserSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(
            kind(err),
            OrchestratorErrorKind::InvalidInput(m) if m == "prompt required"
        ));
    }

    #[test]
    fn test_override_then_default_then_fallback() {
        let settings = UserSettings {
            default_width: Some(640),
            default_steps: Some(40),
            default_sampler: Some("DDIM".to_string()),
            ..UserSettings::default()
        };
        let overrides = ParameterOverrides::default().with_width(1024).with_cfg_scale(9.5);

        let request =
            build_request(&GenerationParams::new("sunset"), &overrides, &settings).unwrap();
        assert_eq!(*request.width(), 1024);
        assert_eq!(*request.height(), FALLBACK_HEIGHT);
        assert_eq!(*request.steps(), 40);
        assert_eq!(*request.cfg_scale(), 9.5);
        assert_eq!(request.sampler(), "DDIM");
        assert_eq!(request.model_id(), FALLBACK_MODEL_ID);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let overrides = ParameterOverrides::default()
            .with_width(3000)
            .with_height(10)
            .with_image_count(9);
        let request = build_request(
            &GenerationParams::new("sunset"),
            &overrides,
            &UserSettings::default(),
        )
        .unwrap();
        assert_eq!(*request.width(), 2048);
        assert_eq!(*request.height(), 64);
        assert_eq!(*request.image_count(), 4);
    }

    #[test]
    fn test_profile_beats_model_override() {
        let params = GenerationParams::new("portrait")
            .with_profile(ModelProfile::find("cinematic_realism").unwrap());
        let overrides = ParameterOverrides::default().with_model_id("anylorav15".to_string());

        let request = build_request(&params, &overrides, &UserSettings::default()).unwrap();
        assert_eq!(request.model_id(), "dreamshaper_v8");
        assert_eq!(request.vae_id().as_deref(), Some("vae-clarity"));
        assert_eq!(request.profile_id().as_deref(), Some("cinematic_realism"));
        assert_eq!(model_label(&params, &request), "Cinematic Realism (Model + VAE)");
    }

    #[test]
    fn test_nsfw_policy() {
        let flags = vermeer_core::GenerationFlags {
            nsfw: true,
            ..Default::default()
        };

        let blocked = GenerationParams::new("x")
            .with_flags(flags)
            .with_profile(ModelProfile::find("realism_base").unwrap());
        let err = build_request(&blocked, &ParameterOverrides::default(), &UserSettings::default())
            .unwrap_err();
        assert!(matches!(kind(err), OrchestratorErrorKind::PolicyViolation(_)));

        let allowed = GenerationParams::new("x")
            .with_flags(flags)
            .with_profile(ModelProfile::find("nsfw_realism").unwrap());
        assert!(
            build_request(&allowed, &ParameterOverrides::default(), &UserSettings::default())
                .is_ok()
        );

        let no_profile = GenerationParams::new("x").with_flags(flags);
        assert!(
            build_request(&no_profile, &ParameterOverrides::default(), &UserSettings::default())
                .is_ok()
        );
    }

    #[test]
    fn test_source_image_required() {
        let params = GenerationParams::new("x").with_modality(Modality::ImageToVideo);
        let err = build_request(&params, &ParameterOverrides::default(), &UserSettings::default())
            .unwrap_err();
        assert!(matches!(kind(err), OrchestratorErrorKind::InvalidInput(_)));

        let inpaint = GenerationParams::new("x")
            .with_modality(Modality::Inpainting)
            .with_source_image(vec![1, 2, 3]);
        assert!(
            build_request(&inpaint, &ParameterOverrides::default(), &UserSettings::default())
                .is_err()
        );
    }
}
