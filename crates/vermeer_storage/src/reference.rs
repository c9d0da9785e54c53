//! Media reference types.

use crate::MediaType;
use uuid::Uuid;

/// Reference to stored media.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaReference {
    /// Unique identifier for this reference
    pub id: Uuid,
    /// SHA-256 hash of the content
    pub content_hash: String,
    /// Path of the stored file
    pub storage_path: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Type of media
    pub media_type: MediaType,
    /// MIME type
    pub mime_type: String,
}
