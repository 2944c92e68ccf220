use crate::models::UserProfile;
use sqlx::PgPool;
use uuid::Uuid;

/// Load a user's public projection. Secret columns are excluded at the
/// query level so they can never leak through the gate.
pub async fn find_profile_by_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserProfile>, sqlx::Error> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, username, full_name, avatar_url
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}
