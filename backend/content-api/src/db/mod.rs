/// Database repositories for content-api
///
/// Plain functions over `&PgPool`; services own the domain rules, these own
/// the SQL.
pub mod tweet_repo;
pub mod user_repo;
pub mod video_repo;
