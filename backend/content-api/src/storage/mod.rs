/// Object storage for published media
///
/// The storage collaborator takes a staged local file and returns a hosted
/// URL (plus, for video, a probed duration); deletion is by previously
/// returned URL. Handlers and services depend on the [`ObjectStorage`]
/// trait, `S3Storage` is the production implementation.
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use tokio::process::Command;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

/// What kind of artifact is being stored; decides key prefix and whether a
/// duration is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Thumbnail,
}

impl MediaKind {
    fn key_prefix(&self) -> &'static str {
        match self {
            Self::Video => "videos",
            Self::Thumbnail => "thumbnails",
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Publicly served URL of the stored object
    pub url: String,
    /// Probed media duration in seconds; only set for video uploads
    pub duration_seconds: Option<f64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload a staged local file, returning its hosted URL and, for
    /// video, the probed duration.
    async fn upload(&self, local_path: &Path, kind: MediaKind) -> Result<StoredMedia>;

    /// Delete a previously uploaded object by its returned URL.
    async fn delete(&self, url: &str) -> Result<()>;
}

// =====================================================================
// Pair/replace helpers
// =====================================================================

/// Upload a video and its thumbnail as a pair. If the thumbnail upload
/// fails after the video succeeded, the video artifact is deleted again so
/// a half-published pair never leaks into the bucket.
pub async fn upload_media_pair(
    storage: &dyn ObjectStorage,
    video_path: &Path,
    thumbnail_path: &Path,
) -> Result<(StoredMedia, StoredMedia)> {
    let video = storage.upload(video_path, MediaKind::Video).await?;

    match storage.upload(thumbnail_path, MediaKind::Thumbnail).await {
        Ok(thumbnail) => Ok((video, thumbnail)),
        Err(err) => {
            if let Err(cleanup_err) = storage.delete(&video.url).await {
                tracing::warn!(
                    url = %video.url,
                    "failed to clean up video artifact after thumbnail upload error: {}",
                    cleanup_err
                );
            }
            Err(err)
        }
    }
}

/// Replace a stored artifact: upload the new file first, and only after it
/// succeeds delete the old one. A failed delete of the old artifact is
/// logged and swallowed; the caller already holds the new URL.
pub async fn replace_media(
    storage: &dyn ObjectStorage,
    new_path: &Path,
    kind: MediaKind,
    old_url: &str,
) -> Result<StoredMedia> {
    let replacement = storage.upload(new_path, kind).await?;

    if let Err(err) = storage.delete(old_url).await {
        tracing::warn!(url = %old_url, "failed to delete replaced artifact: {}", err);
    }

    Ok(replacement)
}

// =====================================================================
// S3 implementation
// =====================================================================

pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Build the S3 client from configuration. Static credentials and a
    /// custom endpoint (MinIO etc.) are optional; otherwise the default
    /// provider chain applies.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut aws_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            use aws_sdk_s3::config::Credentials;

            let credentials = Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "content_api_s3",
            );
            aws_config_builder = aws_config_builder.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        let aws_config = aws_config_builder.load().await;

        Self {
            client: Client::new(&aws_config),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_key(&self, local_path: &Path, kind: MediaKind) -> String {
        match local_path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}/{}.{}", kind.key_prefix(), Uuid::new_v4(), ext),
            None => format!("{}/{}", kind.key_prefix(), Uuid::new_v4()),
        }
    }

    fn key_from_url(&self, url: &str) -> Result<String> {
        url.strip_prefix(&self.public_base_url)
            .map(|k| k.trim_start_matches('/').to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::Storage(format!("URL is not managed by this bucket: {url}"))
            })
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(&self, local_path: &Path, kind: MediaKind) -> Result<StoredMedia> {
        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            AppError::Storage(format!(
                "failed to read staged file {}: {}",
                local_path.display(),
                e
            ))
        })?;

        let key = self.object_key(local_path, kind);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type(content_type_for(local_path).to_string())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload of {key} failed: {e}")))?;

        let duration_seconds = match kind {
            MediaKind::Video => probe_duration(local_path).await,
            MediaKind::Thumbnail => None,
        };

        Ok(StoredMedia {
            url: format!("{}/{}", self.public_base_url, key),
            duration_seconds,
        })
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let key = self.key_from_url(url)?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("delete of {key} failed: {e}")))?;

        Ok(())
    }
}

/// MIME type from the staged file's extension
fn content_type_for(path: &Path) -> mime::Mime {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp4") | Some("m4v") => "video/mp4".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        Some("mov") => "video/quicktime"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        Some("webm") => "video/webm".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("png") => mime::IMAGE_PNG,
        Some("gif") => mime::IMAGE_GIF,
        Some("webp") => "image/webp".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Probe the media duration with ffprobe. Failure degrades to None with a
/// warning; duration is best-effort metadata, not a publish precondition.
async fn probe_duration(local_path: &Path) -> Option<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_format",
            "-of",
            "json",
            local_path.to_string_lossy().as_ref(),
        ])
        .output()
        .await;

    let output = match output {
        Ok(out) if out.status.success() => out,
        Ok(_) => {
            tracing::warn!(path = %local_path.display(), "ffprobe exited with failure");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %local_path.display(), "ffprobe spawn error: {}", e);
            return None;
        }
    };

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).ok()?;
    json.get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|d| d.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn stored(url: &str) -> StoredMedia {
        StoredMedia {
            url: url.to_string(),
            duration_seconds: None,
        }
    }

    #[tokio::test]
    async fn test_pair_upload_success_never_deletes() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .withf(|_, kind| *kind == MediaKind::Video)
            .times(1)
            .returning(|_, _| {
                Ok(StoredMedia {
                    url: "https://cdn.test/videos/a.mp4".to_string(),
                    duration_seconds: Some(12.5),
                })
            });
        storage
            .expect_upload()
            .withf(|_, kind| *kind == MediaKind::Thumbnail)
            .times(1)
            .returning(|_, _| Ok(stored("https://cdn.test/thumbnails/a.jpg")));
        storage.expect_delete().times(0);

        let (video, thumb) = upload_media_pair(
            &storage,
            Path::new("/tmp/a.mp4"),
            Path::new("/tmp/a.jpg"),
        )
        .await
        .unwrap();

        assert_eq!(video.duration_seconds, Some(12.5));
        assert_eq!(thumb.url, "https://cdn.test/thumbnails/a.jpg");
    }

    #[tokio::test]
    async fn test_pair_upload_compensates_on_thumbnail_failure() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .withf(|_, kind| *kind == MediaKind::Video)
            .times(1)
            .returning(|_, _| Ok(stored("https://cdn.test/videos/a.mp4")));
        storage
            .expect_upload()
            .withf(|_, kind| *kind == MediaKind::Thumbnail)
            .times(1)
            .returning(|_, _| Err(AppError::Storage("thumbnail upload failed".to_string())));
        storage
            .expect_delete()
            .withf(|url| url == "https://cdn.test/videos/a.mp4")
            .times(1)
            .returning(|_| Ok(()));

        let result = upload_media_pair(
            &storage,
            Path::new("/tmp/a.mp4"),
            Path::new("/tmp/a.jpg"),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_replace_deletes_old_only_after_upload() {
        let mut seq = Sequence::new();
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(stored("https://cdn.test/thumbnails/new.jpg")));
        storage
            .expect_delete()
            .withf(|url| url == "https://cdn.test/thumbnails/old.jpg")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let replacement = replace_media(
            &storage,
            Path::new("/tmp/new.jpg"),
            MediaKind::Thumbnail,
            "https://cdn.test/thumbnails/old.jpg",
        )
        .await
        .unwrap();

        assert_eq!(replacement.url, "https://cdn.test/thumbnails/new.jpg");
    }

    #[tokio::test]
    async fn test_replace_keeps_old_when_upload_fails() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .times(1)
            .returning(|_, _| Err(AppError::Storage("upload failed".to_string())));
        storage.expect_delete().times(0);

        let result = replace_media(
            &storage,
            Path::new("/tmp/new.jpg"),
            MediaKind::Thumbnail,
            "https://cdn.test/thumbnails/old.jpg",
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_replace_tolerates_failed_delete_of_old() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .times(1)
            .returning(|_, _| Ok(stored("https://cdn.test/videos/new.mp4")));
        storage
            .expect_delete()
            .times(1)
            .returning(|_| Err(AppError::Storage("delete failed".to_string())));

        let result = replace_media(
            &storage,
            Path::new("/tmp/new.mp4"),
            MediaKind::Video,
            "https://cdn.test/videos/old.mp4",
        )
        .await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_content_type_for_extensions() {
        assert_eq!(
            content_type_for(Path::new("clip.mp4")).essence_str(),
            "video/mp4"
        );
        assert_eq!(
            content_type_for(Path::new("thumb.JPG")).essence_str(),
            "image/jpeg"
        );
        assert_eq!(
            content_type_for(Path::new("mystery.bin")).essence_str(),
            "application/octet-stream"
        );
    }
}
