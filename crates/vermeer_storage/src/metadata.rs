//! Media metadata types.

use crate::MediaType;

/// Metadata about media being stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMetadata {
    /// Type of media
    pub media_type: MediaType,
    /// MIME type (e.g., "image/png", "video/mp4")
    pub mime_type: String,
    /// URL the media was downloaded from
    pub source_url: Option<String>,
}

impl MediaMetadata {
    /// Metadata for a media type, with MIME type inferred from the URL's extension.
    pub fn for_url(media_type: MediaType, url: &str) -> Self {
        let mime_type = url_extension(url)
            .and_then(mime_for_extension)
            .filter(|mime| mime.starts_with(&media_type.to_string()))
            .unwrap_or(match media_type {
                MediaType::Image => "image/png",
                MediaType::Video => "video/mp4",
            });

        Self {
            media_type,
            mime_type: mime_type.to_string(),
            source_url: Some(url.to_string()),
        }
    }

    /// File extension for the stored file.
    pub fn extension(&self) -> &'static str {
        extension_for_mime(&self.mime_type).unwrap_or(self.media_type.default_extension())
    }
}

fn url_extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

const MIME_TABLE: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
];

/// MIME type for a file extension.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    MIME_TABLE
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// Preferred file extension for a MIME type.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    MIME_TABLE
        .iter()
        .find(|(_, m)| m.eq_ignore_ascii_case(essence))
        .map(|(ext, _)| *ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_url_infers_mime() {
        let meta = MediaMetadata::for_url(MediaType::Image, "https://cdn/a/b.JPG?sig=1");
        assert_eq!(meta.mime_type, "image/jpeg");
        assert_eq!(meta.extension(), "jpg");

        let video = MediaMetadata::for_url(MediaType::Video, "https://cdn/clip");
        assert_eq!(video.mime_type, "video/mp4");
    }

    #[test]
    fn test_mismatched_extension_falls_back() {
        let meta = MediaMetadata::for_url(MediaType::Video, "https://cdn/poster.png");
        assert_eq!(meta.mime_type, "video/mp4");
    }

    #[test]
    fn test_extension_ignores_parameters() {
        assert_eq!(extension_for_mime("image/webp; q=1"), Some("webp"));
        assert_eq!(extension_for_mime("application/octet-stream"), None);
    }
}
