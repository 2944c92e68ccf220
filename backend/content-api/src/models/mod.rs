/// Data models for content-api
///
/// Database entities (sqlx::FromRow) and the response DTOs derived from
/// them. Entities stay snake_case; DTOs serialize camelCase for the wire.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ========================================
// Users (external projection)
// ========================================

/// Public projection of a user row. Secret columns (password hash, email)
/// are never selected into this type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

// ========================================
// Tweets
// ========================================

/// Tweet database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tweet {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tweet joined with its owner's public profile. The owner columns are
/// nullable because the join is a LEFT JOIN: a deleted owner leaves the
/// tweet with no profile attached.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetWithOwner {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_username: Option<String>,
    pub owner_full_name: Option<String>,
    pub owner_avatar_url: Option<String>,
}

/// Tweet response DTO
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tweet> for TweetResponse {
    fn from(tweet: Tweet) -> Self {
        Self {
            id: tweet.id,
            owner: tweet.owner_id,
            content: tweet.content,
            created_at: tweet.created_at,
            updated_at: tweet.updated_at,
        }
    }
}

/// Owner profile embedded in a feed item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetOwner {
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

/// One entry of the user-tweets feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetFeedItem {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: Option<TweetOwner>,
}

impl From<TweetWithOwner> for TweetFeedItem {
    fn from(row: TweetWithOwner) -> Self {
        let owner = match (row.owner_username, row.owner_full_name) {
            (Some(username), Some(full_name)) => Some(TweetOwner {
                username,
                full_name,
                avatar: row.owner_avatar_url,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            owner,
        }
    }
}

/// One page of a user's tweets
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTweetsPage {
    pub total_tweets: u64,
    pub tweets: Vec<TweetFeedItem>,
    pub page: u32,
    pub total_pages: u64,
}

// ========================================
// Videos
// ========================================

/// Video database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_seconds: f64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video response DTO
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self {
            id: video.id,
            owner: video.owner_id,
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            duration: video.duration_seconds,
            is_published: video.is_published,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

// ========================================
// Subscriptions
// ========================================

/// Subscription entity. Data shape only: the channel/subscriber join is
/// consumed by other queries, there are no dedicated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub channel_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
