use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use content_api::models::TweetWithOwner;
use content_api::services::tweets::{paginate_feed, MAX_PAGE_SIZE};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Build a row as the repository would return it: `seq` is the insertion
/// position, `created_at` the tweet's creation time.
fn row(seq: usize, created_at: DateTime<Utc>) -> TweetWithOwner {
    TweetWithOwner {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        content: format!("tweet #{}", seq),
        created_at,
        updated_at: created_at,
        owner_username: Some("marta".to_string()),
        owner_full_name: Some("Marta Vidal".to_string()),
        owner_avatar_url: None,
    }
}

/// Rows in insertion order with strictly increasing timestamps.
fn rows_increasing(count: usize) -> Vec<TweetWithOwner> {
    (0..count)
        .map(|i| row(i, base_time() + Duration::seconds(i as i64)))
        .collect()
}

#[test]
fn test_total_pages_is_ceiling_of_total_over_limit() {
    for (total, limit, expected_pages) in [
        (0usize, 10u32, 0u64),
        (1, 10, 1),
        (10, 10, 1),
        (11, 10, 2),
        (15, 10, 2),
        (99, 25, 4),
        (100, 25, 4),
        (101, 25, 5),
    ] {
        let page = paginate_feed(rows_increasing(total), 1, limit);
        assert_eq!(page.total_tweets, total as u64);
        assert_eq!(
            page.total_pages, expected_pages,
            "total={} limit={}",
            total, limit
        );
    }
}

#[test]
fn test_slice_length_formula() {
    // tweets.len() == min(limit, max(0, total - (page-1)*limit))
    let total = 23usize;
    let limit = 7u32;
    for page_no in 1u32..=6 {
        let feed = paginate_feed(rows_increasing(total), page_no, limit);
        let expected = total
            .saturating_sub((page_no as usize - 1) * limit as usize)
            .min(limit as usize);
        assert_eq!(feed.tweets.len(), expected, "page={}", page_no);
        assert_eq!(feed.total_tweets, total as u64);
    }
}

#[test]
fn test_newest_first_ordering() {
    let feed = paginate_feed(rows_increasing(30), 1, 30);
    for pair in feed.tweets.windows(2) {
        assert!(
            pair[0].created_at >= pair[1].created_at,
            "feed must be sorted newest first"
        );
    }
    // The newest insertion lands on top
    assert_eq!(feed.tweets[0].content, "tweet #29");
}

#[test]
fn test_ties_keep_insertion_order() {
    // Three tweets share one timestamp; the stable sort must keep their
    // insertion order among themselves.
    let t = base_time();
    let rows = vec![
        row(0, t + Duration::seconds(5)),
        row(1, t),
        row(2, t),
        row(3, t),
        row(4, t + Duration::seconds(9)),
    ];

    let feed = paginate_feed(rows, 1, 10);
    let contents: Vec<&str> = feed.tweets.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["tweet #4", "tweet #0", "tweet #1", "tweet #2", "tweet #3"]
    );
}

#[test]
fn test_repagination_is_stable() {
    let t = base_time();
    let build = || {
        vec![
            row(0, t),
            row(1, t),
            row(2, t + Duration::seconds(1)),
            row(3, t),
            row(4, t + Duration::seconds(1)),
        ]
    };

    let first = paginate_feed(build(), 1, 3);
    let second = paginate_feed(build(), 1, 3);

    let ids = |feed: &content_api::models::UserTweetsPage| {
        feed.tweets
            .iter()
            .map(|t| t.content.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn test_out_of_range_page_yields_empty_slice() {
    let feed = paginate_feed(rows_increasing(5), 4, 10);
    assert!(feed.tweets.is_empty());
    assert_eq!(feed.total_tweets, 5);
    assert_eq!(feed.total_pages, 1);
    assert_eq!(feed.page, 4);
}

#[test]
fn test_empty_feed_is_not_an_error() {
    let feed = paginate_feed(Vec::new(), 1, 10);
    assert_eq!(feed.total_tweets, 0);
    assert_eq!(feed.total_pages, 0);
    assert!(feed.tweets.is_empty());
}

#[test]
fn test_fifteen_tweets_page_two_limit_ten() {
    // 15 tweets, page=2, limit=10 -> tweets 11..15, five items, two pages
    let feed = paginate_feed(rows_increasing(15), 2, 10);
    assert_eq!(feed.tweets.len(), 5);
    assert_eq!(feed.total_tweets, 15);
    assert_eq!(feed.total_pages, 2);
    // Newest-first: page 2 holds the five oldest
    let contents: Vec<&str> = feed.tweets.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["tweet #4", "tweet #3", "tweet #2", "tweet #1", "tweet #0"]
    );
}

#[test]
fn test_limit_is_capped() {
    let feed = paginate_feed(rows_increasing(150), 1, 10_000);
    assert_eq!(feed.tweets.len(), MAX_PAGE_SIZE as usize);
    assert_eq!(feed.total_pages, 2);
}

#[test]
fn test_absent_owner_projects_to_none() {
    let mut orphan = row(0, base_time());
    orphan.owner_username = None;
    orphan.owner_full_name = None;
    orphan.owner_avatar_url = None;

    let feed = paginate_feed(vec![orphan, row(1, base_time() + Duration::seconds(1))], 1, 10);
    assert!(feed.tweets[1].owner.is_none());
    assert!(feed.tweets[0].owner.is_some());
}

#[test]
fn test_feed_page_serializes_camel_case() {
    let feed = paginate_feed(rows_increasing(2), 1, 10);
    let json = serde_json::to_value(&feed).unwrap();

    assert!(json.get("totalTweets").is_some());
    assert!(json.get("totalPages").is_some());
    assert!(json.get("page").is_some());
    let item = &json["tweets"][0];
    assert!(item.get("createdAt").is_some());
    assert_eq!(item["owner"]["fullName"], "Marta Vidal");
}
