use crate::models::{Tweet, TweetWithOwner};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new tweet owned by `owner_id`
pub async fn insert_tweet(
    pool: &PgPool,
    owner_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        INSERT INTO tweets (owner_id, content)
        VALUES ($1, $2)
        RETURNING id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(tweet)
}

/// Find a tweet by ID
pub async fn find_tweet_by_id(pool: &PgPool, tweet_id: Uuid) -> Result<Option<Tweet>, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        SELECT id, owner_id, content, created_at, updated_at
        FROM tweets
        WHERE id = $1
        "#,
    )
    .bind(tweet_id)
    .fetch_optional(pool)
    .await?;

    Ok(tweet)
}

/// Replace a tweet's content
pub async fn update_tweet_content(
    pool: &PgPool,
    tweet_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        UPDATE tweets
        SET content = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(tweet_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(tweet)
}

/// Delete a tweet, returning the number of rows removed
pub async fn delete_tweet(pool: &PgPool, tweet_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Fetch all of a user's tweets joined with the owner's public profile.
///
/// LEFT JOIN keeps tweets whose owner row is gone (owner columns come back
/// NULL). The ORDER BY gives a deterministic stand-in for insertion order,
/// which the in-memory feed sort relies on for its tie-break.
pub async fn find_tweets_with_owner(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<TweetWithOwner>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TweetWithOwner>(
        r#"
        SELECT t.id, t.owner_id, t.content, t.created_at, t.updated_at,
               u.username AS owner_username,
               u.full_name AS owner_full_name,
               u.avatar_url AS owner_avatar_url
        FROM tweets t
        LEFT JOIN users u ON u.id = t.owner_id
        WHERE t.owner_id = $1
        ORDER BY t.created_at ASC, t.id ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
