/// Tweet handlers - HTTP endpoints for tweet operations
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::TweetResponse;
use crate::response::ApiResponse;
use crate::services::tweets::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::services::TweetService;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTweetRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Content checks run in the service, after the existence and ownership
/// ladder: a non-owner gets Forbidden even when their content is invalid.
#[derive(Debug, Deserialize)]
pub struct UpdateTweetRequest {
    pub content: String,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Create a new tweet
/// POST /api/v1/tweets
pub async fn create_tweet(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    req: web::Json<CreateTweetRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = TweetService::new((**pool).clone());
    let tweet = service.create_tweet(user.id(), &req.content).await?;

    Ok(ApiResponse::created(
        TweetResponse::from(tweet),
        "Tweet posted successfully",
    ))
}

/// One page of a user's tweets, newest first
/// GET /api/v1/tweets/user/{user_id}
pub async fn get_user_tweets(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let user_id = Uuid::parse_str(&path)
        .map_err(|_| AppError::Validation("Invalid user id".to_string()))?;

    let service = TweetService::new((**pool).clone());
    let feed = service
        .list_user_tweets(
            user_id,
            query.page.unwrap_or(DEFAULT_PAGE),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;

    let message = if feed.total_tweets == 0 {
        "No tweets found for this user"
    } else {
        "Tweets fetched successfully"
    };

    Ok(ApiResponse::ok(feed, message))
}

/// Update a tweet's content
/// PATCH /api/v1/tweets/{tweet_id}
pub async fn update_tweet(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<String>,
    req: web::Json<UpdateTweetRequest>,
) -> Result<HttpResponse> {
    let tweet_id = Uuid::parse_str(&path)
        .map_err(|_| AppError::Validation("Invalid tweet id".to_string()))?;

    let service = TweetService::new((**pool).clone());
    let tweet = service.update_tweet(user.id(), tweet_id, &req.content).await?;

    Ok(ApiResponse::ok(
        TweetResponse::from(tweet),
        "Tweet updated successfully",
    ))
}

/// Delete a tweet
/// DELETE /api/v1/tweets/{tweet_id}
pub async fn delete_tweet(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let tweet_id = Uuid::parse_str(&path)
        .map_err(|_| AppError::Validation("Invalid tweet id".to_string()))?;

    let service = TweetService::new((**pool).clone());
    service.delete_tweet(user.id(), tweet_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Tweet deleted successfully",
    ))
}
