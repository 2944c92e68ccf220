/// Domain services for content-api
pub mod tweets;
pub mod videos;

pub use tweets::TweetService;
pub use videos::{VideoChanges, VideoService};
