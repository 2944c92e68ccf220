/// HTTP handlers for content-api
pub mod tweets;
pub mod videos;

pub use tweets::{create_tweet, delete_tweet, get_user_tweets, update_tweet};
pub use videos::{delete_video, get_video, publish_video, toggle_publish, update_video};
