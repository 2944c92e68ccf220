/// Video handlers - HTTP endpoints for video operations
///
/// The staged `*_file` fields carry local paths produced by the upload
/// collaborator; this service moves them into object storage and persists
/// the hosted URLs.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::VideoResponse;
use crate::response::ApiResponse;
use crate::services::{VideoChanges, VideoService};
use crate::storage::ObjectStorage;

#[derive(Debug, Deserialize, Validate)]
pub struct PublishVideoRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// Staged local path of the uploaded video; absence is a validation
    /// error in the envelope, checked before any storage call
    pub video_file: Option<String>,
    /// Staged local path of the uploaded thumbnail
    pub thumbnail_file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_file: Option<String>,
    pub thumbnail_file: Option<String>,
}

/// Publish a new video
/// POST /api/v1/videos
pub async fn publish_video(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<dyn ObjectStorage>>,
    user: CurrentUser,
    req: web::Json<PublishVideoRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = VideoService::new((**pool).clone(), storage.get_ref().clone());
    let video = service
        .publish(
            user.id(),
            &req.title,
            &req.description,
            req.video_file.as_deref(),
            req.thumbnail_file.as_deref(),
        )
        .await?;

    Ok(ApiResponse::created(
        VideoResponse::from(video),
        "Video published successfully",
    ))
}

/// Get a specific video
/// GET /api/v1/videos/{video_id}
pub async fn get_video(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<dyn ObjectStorage>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_video_id(&path)?;

    let service = VideoService::new((**pool).clone(), storage.get_ref().clone());
    let video = service.get_video(video_id).await?;

    Ok(ApiResponse::ok(
        VideoResponse::from(video),
        "Video fetched successfully",
    ))
}

/// Update a video's metadata and/or media
/// PATCH /api/v1/videos/{video_id}
pub async fn update_video(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<dyn ObjectStorage>>,
    user: CurrentUser,
    path: web::Path<String>,
    req: web::Json<UpdateVideoRequest>,
) -> Result<HttpResponse> {
    let video_id = parse_video_id(&path)?;
    let req = req.into_inner();

    let service = VideoService::new((**pool).clone(), storage.get_ref().clone());
    let video = service
        .update(
            user.id(),
            video_id,
            VideoChanges {
                title: req.title,
                description: req.description,
                video_file: req.video_file,
                thumbnail_file: req.thumbnail_file,
            },
        )
        .await?;

    Ok(ApiResponse::ok(
        VideoResponse::from(video),
        "Video updated successfully",
    ))
}

/// Delete a video
/// DELETE /api/v1/videos/{video_id}
pub async fn delete_video(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<dyn ObjectStorage>>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_video_id(&path)?;

    let service = VideoService::new((**pool).clone(), storage.get_ref().clone());
    service.delete(user.id(), video_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Video deleted successfully",
    ))
}

/// Toggle the published flag
/// PATCH /api/v1/videos/{video_id}/publish
pub async fn toggle_publish(
    pool: web::Data<PgPool>,
    storage: web::Data<Arc<dyn ObjectStorage>>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_video_id(&path)?;

    let service = VideoService::new((**pool).clone(), storage.get_ref().clone());
    let video = service.toggle_publish(user.id(), video_id).await?;

    Ok(ApiResponse::ok(
        VideoResponse::from(video),
        "Publish status updated successfully",
    ))
}

fn parse_video_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid video id".to_string()))
}
