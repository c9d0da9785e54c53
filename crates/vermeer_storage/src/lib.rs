//! Content-addressable media storage for Vermeer.
//!
//! Result media can be copied from the provider's CDN into a local store so
//! history entries survive URL expiry. [`FileSystemStorage`] keeps files by
//! SHA-256 hash; [`MediaDownloader`] fetches result URLs with retry and
//! implements [`vermeer_interface::MediaArchiver`].
//!
//! # Example
//!
//! ```rust
//! use vermeer_storage::{FileSystemStorage, MediaMetadata, MediaStorage, MediaType};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemStorage::new("/tmp/vermeer-media")?;
//! let metadata = MediaMetadata::for_url(MediaType::Image, "https://cdn.example/sunset.png");
//!
//! let data = vec![0u8; 1024];
//! let reference = storage.store(&data, &metadata).await?;
//! assert!(reference.storage_path.ends_with(".png"));
//!
//! let retrieved = storage.retrieve(&reference).await?;
//! assert_eq!(data, retrieved);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod downloader;
mod filesystem;
mod media_type;
mod metadata;
mod reference;
mod storage;

pub use downloader::{DEFAULT_MAX_DOWNLOAD_BYTES, MediaDownloader};
pub use filesystem::FileSystemStorage;
pub use media_type::MediaType;
pub use metadata::{MediaMetadata, extension_for_mime, mime_for_extension};
pub use reference::MediaReference;
pub use storage::MediaStorage;
pub use vermeer_error::{StorageError, StorageErrorKind};
