/// Tweet service - creation, mutation, and the paginated owner feed
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::tweet_repo;
use crate::error::{AppError, Result};
use crate::models::{Tweet, TweetWithOwner, UserTweetsPage};

/// Page number used when the query string omits one
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the query string omits one
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Hard cap on requested page size
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct TweetService {
    pool: PgPool,
}

impl TweetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a tweet owned by the acting identity.
    pub async fn create_tweet(&self, owner_id: Uuid, content: &str) -> Result<Tweet> {
        let content = validated_content(content)?;
        let tweet = tweet_repo::insert_tweet(&self.pool, owner_id, content).await?;
        Ok(tweet)
    }

    /// Replace a tweet's content. Only the owner may update.
    pub async fn update_tweet(&self, actor_id: Uuid, tweet_id: Uuid, content: &str) -> Result<Tweet> {
        let existing = tweet_repo::find_tweet_by_id(&self.pool, tweet_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

        if existing.owner_id != actor_id {
            return Err(AppError::Forbidden("You do not own this tweet".to_string()));
        }

        let content = validated_content(content)?;
        let tweet = tweet_repo::update_tweet_content(&self.pool, tweet_id, content).await?;
        Ok(tweet)
    }

    /// Delete a tweet. Only the owner may delete; deleting an id that does
    /// not resolve is NotFound, never a silent success.
    pub async fn delete_tweet(&self, actor_id: Uuid, tweet_id: Uuid) -> Result<()> {
        let existing = tweet_repo::find_tweet_by_id(&self.pool, tweet_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

        if existing.owner_id != actor_id {
            return Err(AppError::Forbidden("You do not own this tweet".to_string()));
        }

        let removed = tweet_repo::delete_tweet(&self.pool, tweet_id).await?;
        if removed == 0 {
            // Raced with a concurrent delete
            return Err(AppError::NotFound("Tweet not found".to_string()));
        }

        Ok(())
    }

    /// One page of a user's tweets, newest first, each enriched with the
    /// owner's public profile.
    pub async fn list_user_tweets(
        &self,
        target_user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<UserTweetsPage> {
        let rows = tweet_repo::find_tweets_with_owner(&self.pool, target_user_id).await?;
        Ok(paginate_feed(rows, page, limit))
    }
}

/// Slice the full joined set into one feed page.
///
/// The rows arrive in insertion order; the sort by creation time descending
/// is stable, so tweets created at the same instant keep that order. The
/// total and page count are computed over the full set before slicing, and
/// an out-of-range page yields an empty slice rather than an error.
pub fn paginate_feed(mut rows: Vec<TweetWithOwner>, page: u32, limit: u32) -> UserTweetsPage {
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_PAGE_SIZE);

    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = rows.len() as u64;
    let total_pages = total.div_ceil(limit as u64);

    let start = (page as usize - 1).saturating_mul(limit as usize);
    let tweets = rows
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .map(Into::into)
        .collect();

    UserTweetsPage {
        total_tweets: total,
        tweets,
        page,
        total_pages,
    }
}

fn validated_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Tweet content must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_trimmed() {
        assert_eq!(validated_content("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn test_blank_content_rejected() {
        assert!(matches!(
            validated_content("   \n\t "),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(validated_content(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_page_and_limit_coercion() {
        // page 0 is treated as page 1, limit clamped into [1, MAX_PAGE_SIZE]
        let page = paginate_feed(Vec::new(), 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_tweets, 0);
        assert_eq!(page.total_pages, 0);
    }
}
