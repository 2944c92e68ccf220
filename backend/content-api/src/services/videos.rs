/// Video service - publish, metadata/media updates, deletion
use sqlx::PgPool;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::video_repo;
use crate::error::{AppError, Result};
use crate::models::Video;
use crate::storage::{replace_media, upload_media_pair, MediaKind, ObjectStorage};

/// Optional field set for a video update. `None` fields keep their prior
/// value; at least one field must be present.
#[derive(Debug, Default)]
pub struct VideoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_file: Option<String>,
    pub thumbnail_file: Option<String>,
}

impl VideoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.video_file.is_none()
            && self.thumbnail_file.is_none()
    }
}

pub struct VideoService {
    pool: PgPool,
    storage: Arc<dyn ObjectStorage>,
}

impl VideoService {
    pub fn new(pool: PgPool, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { pool, storage }
    }

    /// Publish a video: upload the staged artifacts, then persist the
    /// record with the hosted URLs and probed duration.
    ///
    /// All input validation happens before the first upload, so a bad
    /// request never touches storage. If the thumbnail upload or the
    /// insert fails part-way, already-uploaded artifacts are deleted again.
    pub async fn publish(
        &self,
        owner_id: Uuid,
        title: &str,
        description: &str,
        video_file: Option<&str>,
        thumbnail_file: Option<&str>,
    ) -> Result<Video> {
        let title = validated_field(title, "Title must not be empty")?;
        let description = validated_field(description, "Description must not be empty")?;
        let video_file = staged_path(video_file, "Video file is required")?;
        let thumbnail_file = staged_path(thumbnail_file, "Thumbnail is required")?;

        let (video_media, thumbnail_media) = upload_media_pair(
            self.storage.as_ref(),
            Path::new(video_file),
            Path::new(thumbnail_file),
        )
        .await?;

        let inserted = video_repo::insert_video(
            &self.pool,
            owner_id,
            &title,
            &description,
            &video_media.url,
            &thumbnail_media.url,
            video_media.duration_seconds.unwrap_or(0.0),
        )
        .await;

        match inserted {
            Ok(video) => Ok(video),
            Err(err) => {
                // The record never landed; reclaim both artifacts.
                for url in [&video_media.url, &thumbnail_media.url] {
                    if let Err(cleanup_err) = self.storage.delete(url).await {
                        tracing::warn!(
                            %url,
                            "failed to clean up artifact after insert error: {}",
                            cleanup_err
                        );
                    }
                }
                Err(err.into())
            }
        }
    }

    /// Fetch a single video.
    pub async fn get_video(&self, video_id: Uuid) -> Result<Video> {
        video_repo::find_video_by_id(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Apply a partial update. Replacement media is uploaded before the
    /// previous artifact is deleted, so a failed upload leaves the video
    /// intact and pointing at its old media.
    pub async fn update(
        &self,
        actor_id: Uuid,
        video_id: Uuid,
        changes: VideoChanges,
    ) -> Result<Video> {
        if changes.is_empty() {
            return Err(AppError::Validation(
                "At least one field must be provided".to_string(),
            ));
        }

        let existing = self.owned_video(actor_id, video_id).await?;

        let title = match &changes.title {
            Some(t) => validated_field(t, "Title must not be empty")?,
            None => existing.title.clone(),
        };
        let description = match &changes.description {
            Some(d) => validated_field(d, "Description must not be empty")?,
            None => existing.description.clone(),
        };

        let mut video_url = existing.video_url.clone();
        let mut duration_seconds = existing.duration_seconds;
        if let Some(path) = &changes.video_file {
            let replacement = replace_media(
                self.storage.as_ref(),
                Path::new(path),
                MediaKind::Video,
                &existing.video_url,
            )
            .await?;
            video_url = replacement.url;
            duration_seconds = replacement.duration_seconds.unwrap_or(0.0);
        }

        let mut thumbnail_url = existing.thumbnail_url.clone();
        if let Some(path) = &changes.thumbnail_file {
            let replacement = replace_media(
                self.storage.as_ref(),
                Path::new(path),
                MediaKind::Thumbnail,
                &existing.thumbnail_url,
            )
            .await?;
            thumbnail_url = replacement.url;
        }

        let video = video_repo::update_video(
            &self.pool,
            video_id,
            &title,
            &description,
            &video_url,
            &thumbnail_url,
            duration_seconds,
        )
        .await?;

        Ok(video)
    }

    /// Delete a video record, then best-effort delete its stored artifacts.
    pub async fn delete(&self, actor_id: Uuid, video_id: Uuid) -> Result<()> {
        let existing = self.owned_video(actor_id, video_id).await?;

        let removed = video_repo::delete_video(&self.pool, video_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        for url in [&existing.video_url, &existing.thumbnail_url] {
            if let Err(err) = self.storage.delete(url).await {
                tracing::warn!(%url, "failed to delete artifact of removed video: {}", err);
            }
        }

        Ok(())
    }

    /// Flip the published flag.
    pub async fn toggle_publish(&self, actor_id: Uuid, video_id: Uuid) -> Result<Video> {
        let existing = self.owned_video(actor_id, video_id).await?;
        let video = video_repo::set_published(&self.pool, video_id, !existing.is_published).await?;
        Ok(video)
    }

    /// Existence + ownership ladder shared by every mutation.
    async fn owned_video(&self, actor_id: Uuid, video_id: Uuid) -> Result<Video> {
        let existing = video_repo::find_video_by_id(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if existing.owner_id != actor_id {
            return Err(AppError::Forbidden("You do not own this video".to_string()));
        }

        Ok(existing)
    }
}

fn validated_field(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

fn staged_path<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_field_trims() {
        assert_eq!(
            validated_field("  My Clip  ", "Title must not be empty").unwrap(),
            "My Clip"
        );
    }

    #[test]
    fn test_validated_field_rejects_blank() {
        assert!(matches!(
            validated_field("  \t ", "Title must not be empty"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_staged_path_is_validation_error() {
        assert!(matches!(
            staged_path(None, "Thumbnail is required"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            staged_path(Some("   "), "Thumbnail is required"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            staged_path(Some(" /tmp/staged/a.jpg "), "Thumbnail is required").unwrap(),
            "/tmp/staged/a.jpg"
        );
    }

    #[test]
    fn test_empty_changes_detected() {
        assert!(VideoChanges::default().is_empty());
        assert!(!VideoChanges {
            title: Some("new".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
