//! Core data types for the Vermeer media generation client.
//!
//! This crate provides the data model shared by every Vermeer crate: generation
//! requests, task snapshots and results, history records, user settings, and the
//! pure rules that govern them (status mapping, bounds clamping, parameter resolution).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bounds;
mod catalog;
mod history;
mod modality;
mod params;
mod request;
mod result;
mod settings;
mod state;
mod status;
mod task;
mod telemetry;

pub use bounds::{
    MAX_CFG_SCALE, MAX_DIMENSION, MAX_IMAGE_COUNT, MAX_STEPS, MIN_CFG_SCALE, MIN_DIMENSION,
    MIN_IMAGE_COUNT, MIN_STEPS, clamp_cfg_scale, clamp_dimension, clamp_image_count, clamp_steps,
    clamp_weight,
};
pub use catalog::{AiModel, ModelCapability, ModelProfile, ModelProfileBuilder, ModelType};
pub use history::{HistoryItem, NewHistoryItem};
pub use modality::Modality;
pub use params::{
    FALLBACK_CFG_SCALE, FALLBACK_HEIGHT, FALLBACK_IMAGE_COUNT, FALLBACK_MODEL_ID,
    FALLBACK_SAMPLER, FALLBACK_STEPS, FALLBACK_WIDTH, GenerationParams, ParameterOverrides,
    RemixPayload, resolve,
};
pub use request::{
    GenerationFlags, GenerationRequest, GenerationRequestBuilder, GenerationRequestBuilderError,
    Modifier,
};
pub use result::{GenerationResult, SUCCESS_WITHOUT_MEDIA};
pub use settings::{API_KEY_MIN_LENGTH, UserSettings};
pub use state::GenerationState;
pub use status::TaskStatus;
pub use task::{TaskHandle, TaskSnapshot};
pub use telemetry::init_tracing;
