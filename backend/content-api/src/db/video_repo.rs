use crate::models::Video;
use sqlx::PgPool;
use uuid::Uuid;

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, thumbnail_url, \
                             duration_seconds, is_published, created_at, updated_at";

/// Create a published video record
pub async fn insert_video(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: &str,
    video_url: &str,
    thumbnail_url: &str,
    duration_seconds: f64,
) -> Result<Video, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url,
                            duration_seconds, is_published)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE)
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(video_url)
    .bind(thumbnail_url)
    .bind(duration_seconds)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

/// Find a video by ID
pub async fn find_video_by_id(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
    ))
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(video)
}

/// Persist the merged field set of a video. Callers pass the final values;
/// unchanged fields keep their prior value by being passed back unchanged.
pub async fn update_video(
    pool: &PgPool,
    video_id: Uuid,
    title: &str,
    description: &str,
    video_url: &str,
    thumbnail_url: &str,
    duration_seconds: f64,
) -> Result<Video, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET title = $2, description = $3, video_url = $4, thumbnail_url = $5,
            duration_seconds = $6, updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(video_id)
    .bind(title)
    .bind(description)
    .bind(video_url)
    .bind(thumbnail_url)
    .bind(duration_seconds)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

/// Flip the published flag
pub async fn set_published(
    pool: &PgPool,
    video_id: Uuid,
    is_published: bool,
) -> Result<Video, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET is_published = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(video_id)
    .bind(is_published)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

/// Delete a video record, returning the number of rows removed
pub async fn delete_video(pool: &PgPool, video_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
