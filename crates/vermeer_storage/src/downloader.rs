//! Retrying download of result media into storage.

use crate::{MediaMetadata, MediaStorage, MediaType, extension_for_mime};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{info, instrument, warn};
use vermeer_core::Modality;
use vermeer_error::{
    ApiError, ApiErrorKind, ApiResult, RetryableError, StorageError, StorageErrorKind,
    StorageResult,
};
use vermeer_interface::MediaArchiver;

/// Largest body accepted by default, 512 MiB.
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 512 * 1024 * 1024;

/// Downloads result URLs into a [`MediaStorage`].
///
/// Transient failures (network errors, 408, 429, 5xx) are retried with
/// exponential backoff and jitter, using the strategy suggested by the
/// first error. Permanent failures return immediately. Bodies larger than
/// the size cap are rejected without retry.
#[derive(Clone)]
pub struct MediaDownloader {
    client: Client,
    storage: Arc<dyn MediaStorage>,
    retry_backoff_ms: Option<u64>,
    max_retries: Option<usize>,
    max_bytes: u64,
}

impl std::fmt::Debug for MediaDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDownloader")
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("max_retries", &self.max_retries)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl MediaDownloader {
    /// Create a downloader writing into `storage`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be initialized.
    pub fn new(storage: Arc<dyn MediaStorage>, timeout: Duration) -> StorageResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            StorageError::new(StorageErrorKind::Download(format!(
                "Failed to initialize HTTP client: {}",
                e
            )))
        })?;

        Ok(Self {
            client,
            storage,
            retry_backoff_ms: None,
            max_retries: None,
            max_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
        })
    }

    /// Override the initial backoff and retry count suggested by errors.
    pub fn with_retry_override(
        mut self,
        backoff_ms: Option<u64>,
        max_retries: Option<usize>,
    ) -> Self {
        self.retry_backoff_ms = backoff_ms;
        self.max_retries = max_retries;
        self
    }

    /// Reject bodies larger than `max_bytes`.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    async fn fetch(
        client: Client,
        url: String,
        max_bytes: u64,
    ) -> ApiResult<(Vec<u8>, Option<String>)> {
        let mut response = client.get(&url).send().await.map_err(|e| {
            ApiError::new(ApiErrorKind::Network(format!("Download failed: {}", e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(ApiErrorKind::Http {
                status: status.as_u16(),
                message: format!("Download of {} failed", url),
            }));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(declared) = response.content_length().filter(|len| *len > max_bytes) {
            return Err(too_large(&url, declared, max_bytes));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            ApiError::new(ApiErrorKind::Network(format!(
                "Failed to read download body: {}",
                e
            )))
        })? {
            let received = (body.len() + chunk.len()) as u64;
            if received > max_bytes {
                return Err(too_large(&url, received, max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(ApiError::new(ApiErrorKind::Malformed(format!(
                "Download of {} returned no content",
                url
            ))));
        }

        Ok((body, content_type))
    }

    /// Download `url`, retrying transient failures.
    async fn fetch_with_retry(&self, url: &str) -> ApiResult<(Vec<u8>, Option<String>)> {
        let max_bytes = self.max_bytes;
        let first_error = match Self::fetch(self.client.clone(), url.to_string(), max_bytes).await {
            Ok(downloaded) => return Ok(downloaded),
            Err(e) => e,
        };

        if !first_error.is_retryable() {
            warn!(error = %first_error, "Permanent download error, failing immediately");
            return Err(first_error);
        }

        let (mut initial_ms, mut retries, max_delay_secs) = first_error.retry_strategy_params();

        if let Some(backoff) = self.retry_backoff_ms {
            initial_ms = backoff;
        }
        if let Some(max) = self.max_retries {
            retries = max;
        }

        info!(
            initial_backoff_ms = initial_ms,
            max_retries = retries,
            max_delay_secs,
            "Download failed, will retry with configured strategy"
        );

        let strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(retries);

        let client = self.client.clone();
        let url = url.to_string();
        Retry::spawn(strategy, || {
            let client = client.clone();
            let url = url.clone();
            async move {
                match Self::fetch(client, url, max_bytes).await {
                    Ok(downloaded) => Ok(downloaded),
                    Err(e) if e.is_retryable() => {
                        warn!(error = %e, "Download failed, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(error = %e, "Permanent download error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await
    }
}

fn too_large(url: &str, size: u64, max_bytes: u64) -> ApiError {
    ApiError::new(ApiErrorKind::Malformed(format!(
        "Download of {} exceeds {} bytes (got at least {})",
        url, max_bytes, size
    )))
}

#[async_trait]
impl MediaArchiver for MediaDownloader {
    #[instrument(skip(self), fields(modality = %modality))]
    async fn archive(&self, url: &str, modality: Modality) -> StorageResult<PathBuf> {
        let (data, content_type) = self.fetch_with_retry(url).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Download(format!("{}: {}", url, e.kind)))
        })?;

        let media_type = MediaType::for_modality(modality);
        let mut metadata = MediaMetadata::for_url(media_type, url);
        if let Some(mime) = content_type.filter(|ct| {
            ct.starts_with(&media_type.to_string()) && extension_for_mime(ct).is_some()
        }) {
            metadata.mime_type = mime.split(';').next().unwrap_or(&mime).trim().to_string();
        }

        let reference = self.storage.store(&data, &metadata).await?;
        Ok(PathBuf::from(reference.storage_path))
    }
}
