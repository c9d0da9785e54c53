//! Type conversions between Vermeer core types and the wire DTOs.

use crate::dto::{LoraDto, ModelInfoDto, SubmitResponse, TaskRequestBody, TaskStatusDto};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use vermeer_core::{
    AiModel, GenerationRequest, Modality, ModelType, TaskHandle, TaskSnapshot, TaskStatus,
};
use vermeer_error::{ApiError, ApiErrorKind, ApiResult};

/// Model used by the upscale endpoint.
pub const UPSCALE_MODEL: &str = "RealESRGAN_x4plus";
/// Upscale factor.
pub const UPSCALE_FACTOR: u32 = 4;
/// img2img denoising strength.
pub const DENOISING_STRENGTH: f32 = 0.75;
/// Frames per text-to-video clip.
pub const VIDEO_LENGTH: u32 = 25;
/// Text-to-video frame rate.
pub const VIDEO_FPS: u32 = 8;
/// Inpainting mask blur radius.
pub const MASK_BLUR: u32 = 4;

/// Submission endpoint path for a modality.
pub fn endpoint(modality: Modality) -> &'static str {
    match modality {
        Modality::TextToImage => "v3/async/txt2img",
        Modality::ImageToImage => "v3/async/img2img",
        Modality::TextToVideo => "v3/async/txt2video",
        Modality::ImageToVideo => "v3/async/img2video",
        Modality::Upscale => "v3/async/upscale",
        Modality::Inpainting => "v3/async/inpainting",
    }
}

/// Status endpoint path for a task.
///
/// The id is percent-encoded as a single path segment.
pub fn status_endpoint(task_id: &str) -> String {
    format!("v3/async/task/{}", urlencoding::encode(task_id))
}

fn invalid(message: impl Into<String>) -> ApiError {
    ApiError::new(ApiErrorKind::InvalidRequest(message.into()))
}

fn malformed(message: impl Into<String>) -> ApiError {
    ApiError::new(ApiErrorKind::Malformed(message.into()))
}

fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Converts a GenerationRequest to the submission body.
///
/// # Errors
///
/// Returns `InvalidRequest` when an image-conditioned modality has no source
/// image, or inpainting has no mask.
pub fn to_request_body(request: &GenerationRequest) -> ApiResult<TaskRequestBody> {
    let modality = *request.modality();

    let source = || {
        request
            .source_image()
            .as_deref()
            .filter(|bytes| !bytes.is_empty())
            .map(encode)
            .ok_or_else(|| invalid(format!("{} requires a source image", modality)))
    };

    let mut builder = TaskRequestBody::builder();

    if modality == Modality::Upscale {
        builder
            .model_name(UPSCALE_MODEL)
            .image(source()?)
            .scale(UPSCALE_FACTOR);
    } else {
        builder
            .model_name(request.model_id().clone())
            .prompt(request.prompt().clone())
            .width(*request.width())
            .height(*request.height())
            .steps(*request.steps())
            .cfg_scale(*request.cfg_scale())
            .sampler_name(request.sampler().clone())
            .enable_hr(request.flags().high_res_fix)
            .restore_faces(request.flags().face_restore)
            .nsfw(request.flags().nsfw);

        if let Some(negative) = request
            .negative_prompt()
            .as_ref()
            .filter(|n| !n.trim().is_empty())
        {
            builder.negative_prompt(negative.clone());
        }
        if let Some(seed) = request.seed() {
            builder.seed(*seed);
        }
        if let Some(vae) = request.vae_id() {
            builder.vae(vae.clone());
        }
        if !modality.produces_video() {
            builder.image_num(*request.image_count());
        }
        if !request.modifiers().is_empty() {
            builder.loras(
                request
                    .modifiers()
                    .iter()
                    .map(|m| LoraDto {
                        name: m.name.clone(),
                        weight: m.weight,
                    })
                    .collect::<Vec<_>>(),
            );
        }

        match modality {
            Modality::ImageToImage => {
                builder
                    .images(vec![source()?])
                    .denoising_strength(DENOISING_STRENGTH);
            }
            Modality::TextToVideo => {
                builder.video_length(VIDEO_LENGTH).fps(VIDEO_FPS);
            }
            Modality::ImageToVideo => {
                builder.image(source()?);
            }
            Modality::Inpainting => {
                let mask = request
                    .mask_image()
                    .as_deref()
                    .filter(|bytes| !bytes.is_empty())
                    .map(encode)
                    .ok_or_else(|| invalid("INPAINTING requires a mask image"))?;
                builder
                    .image(source()?)
                    .mask_image(mask)
                    .mask_blur(MASK_BLUR);
            }
            Modality::TextToImage | Modality::Upscale => {}
        }
    }

    builder
        .build()
        .map_err(|e| invalid(format!("Failed to build request body: {}", e)))
}

/// Extracts the task handle from a submission response.
pub fn to_task_handle(response: &SubmitResponse) -> ApiResult<TaskHandle> {
    response.task_id().map(TaskHandle::new).ok_or_else(|| {
        malformed(format!(
            "submission response carries no task_id{}",
            response
                .message
                .as_deref()
                .map(|m| format!(" ({})", m))
                .unwrap_or_default()
        ))
    })
}

/// Normalizes reported progress to a fraction in `[0, 1]`.
///
/// Values above 1 are read as percentages.
pub fn normalize_progress(raw: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
    fraction.clamp(0.0, 1.0)
}

/// Converts a status payload into a snapshot.
///
/// `requested_id` fills in the task id when the payload omits it.
///
/// # Errors
///
/// Returns `Malformed` when the payload has no status or is not the
/// expected shape.
pub fn to_snapshot(requested_id: &str, payload: Value) -> ApiResult<TaskSnapshot> {
    let body = match payload.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => payload,
    };
    let dto: TaskStatusDto = serde_json::from_value(body)
        .map_err(|e| malformed(format!("Failed to parse status response: {}", e)))?;

    let task = dto.task.unwrap_or_default();
    let raw_status = dto
        .status
        .or(task.status)
        .ok_or_else(|| malformed("status response carries no status"))?;

    let task_id = dto
        .task_id
        .or(task.task_id)
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| requested_id.to_string());

    let result = dto.result.unwrap_or_default();
    let image_urls = result
        .images
        .iter()
        .chain(result.image.iter())
        .chain(dto.images.iter())
        .filter_map(|entry| entry.url())
        .map(str::to_string)
        .collect();
    let video_urls = result
        .videos
        .iter()
        .chain(result.video.iter())
        .chain(dto.videos.iter())
        .filter_map(|entry| entry.url())
        .map(str::to_string)
        .collect();

    let error_message = dto
        .error
        .and_then(|e| e.message())
        .or(task.reason)
        .filter(|m| !m.trim().is_empty());

    Ok(TaskSnapshot {
        task_id,
        status: TaskStatus::from_provider(&raw_status),
        progress: dto.progress.or(task.progress_percent).map(normalize_progress),
        image_urls,
        video_urls,
        error_message,
    })
}

/// Converts a `GET v4/models` payload into catalog entries.
pub fn to_models(payload: Value) -> ApiResult<Vec<AiModel>> {
    let list = if payload.is_array() {
        payload
    } else {
        let data = payload.get("data");
        match data {
            Some(d) if d.is_array() => d.clone(),
            Some(d) => d.get("models").cloned().unwrap_or(Value::Null),
            None => payload.get("models").cloned().unwrap_or(Value::Null),
        }
    };

    let models: Vec<ModelInfoDto> = serde_json::from_value(list)
        .map_err(|e| malformed(format!("Failed to parse model list: {}", e)))?;

    Ok(models
        .into_iter()
        .map(|m| AiModel {
            display_name: m
                .display_name
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| m.name.clone()),
            model_type: ModelType::from_provider(m.model_type.as_deref()),
            is_nsfw: m.is_nsfw.unwrap_or(false),
            is_recommended: m.is_recommended.unwrap_or(false),
            name: m.name,
        })
        .collect())
}
