//! Media type enumeration.

use vermeer_core::Modality;

/// Type of stored media.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum MediaType {
    /// Still image (PNG, JPEG, WebP)
    #[display("image")]
    Image,
    /// Video clip (MP4, WebM)
    #[display("video")]
    Video,
}

impl MediaType {
    /// Media produced by a modality.
    pub fn for_modality(modality: Modality) -> Self {
        if modality.produces_video() {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }

    /// Directory name under the storage root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaType::Image => "images",
            MediaType::Video => "video",
        }
    }

    /// Extension used when the MIME type is unknown.
    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaType::Image => "png",
            MediaType::Video => "mp4",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            _ => Err(format!("Unknown media type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_modality() {
        assert_eq!(MediaType::for_modality(Modality::TextToImage), MediaType::Image);
        assert_eq!(MediaType::for_modality(Modality::Upscale), MediaType::Image);
        assert_eq!(MediaType::for_modality(Modality::ImageToVideo), MediaType::Video);
    }

    #[test]
    fn test_display_parses_back() {
        for media_type in [MediaType::Image, MediaType::Video] {
            assert_eq!(media_type.to_string().parse::<MediaType>(), Ok(media_type));
        }
    }
}
