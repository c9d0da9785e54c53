//! Filesystem-based media storage implementation.

use crate::{MediaMetadata, MediaReference, MediaStorage, MediaType};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use vermeer_error::{StorageError, StorageErrorKind, StorageResult};

/// Filesystem storage backend.
///
/// Stores media files in a content-addressable structure:
/// `{base_path}/{images|video}/{hash[0:2]}/{hash[2:4]}/{hash}.{ext}`
///
/// ```text
/// ~/.local/share/vermeer/media/
/// ├── images/
/// │   └── ab/
/// │       └── cd/
/// │           └── abcdef123456....png
/// └── video/
///     └── ef/
///         └── 01/
///             └── ef01789012....mp4
/// ```
///
/// Writes go to a temporary file that is renamed into place.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend, creating the base directory.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %base_path.display(), "Opened filesystem storage");
        Ok(Self { base_path })
    }

    /// Root directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// SHA-256 of `data` as lowercase hex.
    pub fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn get_path(&self, hash: &str, media_type: MediaType, extension: &str) -> PathBuf {
        self.base_path
            .join(media_type.dir_name())
            .join(&hash[0..2])
            .join(&hash[2..4])
            .join(format!("{}.{}", hash, extension))
    }

    fn reference(
        hash: String,
        path: &Path,
        size: usize,
        metadata: &MediaMetadata,
    ) -> MediaReference {
        MediaReference {
            id: Uuid::new_v4(),
            content_hash: hash,
            storage_path: path.to_string_lossy().to_string(),
            size_bytes: size as u64,
            media_type: metadata.media_type,
            mime_type: metadata.mime_type.clone(),
        }
    }

    fn verify_hash(data: &[u8], expected_hash: &str) -> StorageResult<()> {
        let actual_hash = Self::compute_hash(data);
        if actual_hash != expected_hash {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(format!(
                "Hash mismatch: expected {}, got {}",
                expected_hash, actual_hash
            ))));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MediaStorage for FileSystemStorage {
    #[tracing::instrument(
        skip(self, data, metadata),
        fields(size = data.len(), media_type = %metadata.media_type)
    )]
    async fn store(&self, data: &[u8], metadata: &MediaMetadata) -> StorageResult<MediaReference> {
        let hash = Self::compute_hash(data);
        let path = self.get_path(&hash, metadata.media_type, metadata.extension());

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(hash = %hash, path = %path.display(), "Media already stored");
            return Ok(Self::reference(hash, &path, data.len(), metadata));
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Unique temp name so concurrent stores of the same content never share a file
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            hash = %hash,
            path = %path.display(),
            size = data.len(),
            "Stored media file"
        );

        Ok(Self::reference(hash, &path, data.len(), metadata))
    }

    #[tracing::instrument(skip(self, reference), fields(hash = %reference.content_hash))]
    async fn retrieve(&self, reference: &MediaReference) -> StorageResult<Vec<u8>> {
        let path = Path::new(&reference.storage_path);

        let data = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(reference.storage_path.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        Self::verify_hash(&data, &reference.content_hash)?;
        Ok(data)
    }

    #[tracing::instrument(skip(self, reference), fields(hash = %reference.content_hash))]
    async fn delete(&self, reference: &MediaReference) -> StorageResult<()> {
        let path = Path::new(&reference.storage_path);

        tokio::fs::remove_file(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(reference.storage_path.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::info!(path = %path.display(), "Deleted media file");
        Ok(())
    }

    async fn exists(&self, reference: &MediaReference) -> StorageResult<bool> {
        Ok(tokio::fs::try_exists(&reference.storage_path)
            .await
            .unwrap_or(false))
    }
}
