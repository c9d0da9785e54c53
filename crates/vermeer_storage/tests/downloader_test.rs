mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_utils::ScriptedServer;
use vermeer_core::Modality;
use vermeer_interface::MediaArchiver;
use vermeer_storage::{FileSystemStorage, MediaDownloader, StorageErrorKind};

fn downloader(dir: &TempDir) -> MediaDownloader {
    let storage = Arc::new(FileSystemStorage::new(dir.path()).unwrap());
    MediaDownloader::new(storage, Duration::from_secs(5))
        .unwrap()
        .with_retry_override(Some(10), Some(3))
}

#[tokio::test]
async fn test_archive_stores_image() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let server = ScriptedServer::start(vec![(200, "image/webp", b"webp-bytes".to_vec())]).await;
    let url = format!("{}/results/sunset", server.base_url());

    let path = downloader(&dir).archive(&url, Modality::TextToImage).await?;

    assert!(path.starts_with(dir.path().join("images")));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("webp"));
    assert_eq!(std::fs::read(&path)?, b"webp-bytes");
    assert_eq!(server.requests()[0].path, "/results/sunset");
    Ok(())
}

#[tokio::test]
async fn test_archive_video_uses_url_extension() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let server = ScriptedServer::start(vec![(
        200,
        "application/octet-stream",
        b"mp4-bytes".to_vec(),
    )])
    .await;
    let url = format!("{}/clip.webm?sig=abc", server.base_url());

    let path = downloader(&dir).archive(&url, Modality::TextToVideo).await?;

    assert!(path.starts_with(dir.path().join("video")));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("webm"));
    Ok(())
}

#[tokio::test]
async fn test_transient_failure_is_retried() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let server = ScriptedServer::start(vec![
        (503, "text/plain", b"busy".to_vec()),
        (502, "text/plain", b"busy".to_vec()),
        (200, "image/png", b"png-bytes".to_vec()),
    ])
    .await;
    let url = format!("{}/a.png", server.base_url());

    let path = downloader(&dir).archive(&url, Modality::TextToImage).await?;

    assert_eq!(std::fs::read(&path)?, b"png-bytes");
    assert_eq!(server.requests().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_permanent_failure_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let server = ScriptedServer::start(vec![
        (404, "text/plain", b"gone".to_vec()),
        (200, "image/png", b"png-bytes".to_vec()),
    ])
    .await;
    let url = format!("{}/expired.png", server.base_url());

    let err = downloader(&dir)
        .archive(&url, Modality::TextToImage)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, StorageErrorKind::Download(_)));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let dir = TempDir::new().unwrap();
    let server = ScriptedServer::start(vec![
        (500, "text/plain", Vec::new()),
        (500, "text/plain", Vec::new()),
        (500, "text/plain", Vec::new()),
        (500, "text/plain", Vec::new()),
        (500, "text/plain", Vec::new()),
        (200, "image/png", b"late".to_vec()),
    ])
    .await;
    let url = format!("{}/a.png", server.base_url());

    let err = downloader(&dir)
        .archive(&url, Modality::TextToImage)
        .await
        .unwrap_err();

    // first attempt, the retry loop's own attempt, then three retries
    assert!(matches!(err.kind, StorageErrorKind::Download(_)));
    assert_eq!(server.requests().len(), 5);
}

#[tokio::test]
async fn test_oversized_download_is_rejected() {
    let dir = TempDir::new().unwrap();
    let server = ScriptedServer::start(vec![
        (200, "video/mp4", vec![0u8; 64]),
        (200, "video/mp4", vec![0u8; 8]),
    ])
    .await;
    let url = format!("{}/huge.mp4", server.base_url());

    let err = downloader(&dir)
        .with_max_bytes(16)
        .archive(&url, Modality::TextToVideo)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, StorageErrorKind::Download(_)));
    assert!(err.to_string().contains("exceeds 16 bytes"));
    assert_eq!(server.requests().len(), 1);
    assert!(!dir.path().join("video").exists());
}

#[tokio::test]
async fn test_download_at_cap_is_accepted() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let server = ScriptedServer::start(vec![(200, "image/png", vec![7u8; 16])]).await;
    let url = format!("{}/exact.png", server.base_url());

    let path = downloader(&dir)
        .with_max_bytes(16)
        .archive(&url, Modality::TextToImage)
        .await?;

    assert_eq!(std::fs::read(&path)?, vec![7u8; 16]);
    Ok(())
}
