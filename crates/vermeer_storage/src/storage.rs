//! Storage trait definition.

use crate::{MediaMetadata, MediaReference};
use vermeer_error::StorageResult;

/// Backend for downloaded result media.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store media and return a reference.
    ///
    /// Identical content stored twice yields the same path.
    async fn store(&self, data: &[u8], metadata: &MediaMetadata) -> StorageResult<MediaReference>;

    /// Retrieve media, verifying its content hash.
    async fn retrieve(&self, reference: &MediaReference) -> StorageResult<Vec<u8>>;

    /// Delete media.
    async fn delete(&self, reference: &MediaReference) -> StorageResult<()>;

    /// Whether the media exists.
    async fn exists(&self, reference: &MediaReference) -> StorageResult<bool>;
}
