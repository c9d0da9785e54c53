//! Generation modalities.

use serde::{Deserialize, Serialize};

/// Kind of media generation a task performs.
///
/// The string form (`TEXT_TO_IMAGE`, ...) is what history records store.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use vermeer_core::Modality;
///
/// let modality = Modality::from_str("image_to_video").unwrap();
/// assert_eq!(modality, Modality::ImageToVideo);
/// assert!(modality.requires_source_image());
/// assert_eq!(modality.to_string(), "IMAGE_TO_VIDEO");
/// ```
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
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Modality {
    /// Prompt to still image
    #[default]
    TextToImage,
    /// Source image plus prompt to still image
    ImageToImage,
    /// Prompt to video
    TextToVideo,
    /// Source image to video
    ImageToVideo,
    /// Source image to higher resolution image
    Upscale,
    /// Source image plus mask plus prompt to still image
    Inpainting,
}

impl Modality {
    /// Whether the request must carry source image bytes.
    pub fn requires_source_image(self) -> bool {
        matches!(
            self,
            Modality::ImageToImage
                | Modality::ImageToVideo
                | Modality::Upscale
                | Modality::Inpainting
        )
    }

    /// Whether the request must carry a mask image.
    pub fn requires_mask(self) -> bool {
        matches!(self, Modality::Inpainting)
    }

    /// Whether the task produces video rather than still images.
    pub fn produces_video(self) -> bool {
        matches!(self, Modality::TextToVideo | Modality::ImageToVideo)
    }
}
