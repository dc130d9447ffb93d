use std::collections::HashMap;

use anyhow::Result;
use pulse::models::{PostMeta, RawPost, SentimentLabel};
use pulse::pipeline::SentimentPipeline;
use pulse::reddit::{PostFetcher, RedditApi, RedditClientBuilder, RedditError, SearchSort};
use serial_test::serial;

/// In-memory stand-in for Reddit search, keyed by (query, sort).
struct CannedReddit {
    pages: HashMap<(String, &'static str), Vec<RawPost>>,
}

impl CannedReddit {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    fn with(mut self, query: &str, sort: SearchSort, posts: Vec<RawPost>) -> Self {
        self.pages.insert((query.to_string(), sort.as_str()), posts);
        self
    }
}

impl RedditApi for CannedReddit {
    fn search(
        &self,
        _subreddit: &str,
        query: &str,
        sort: SearchSort,
        limit: usize,
    ) -> Result<Vec<RawPost>, RedditError> {
        Ok(self
            .pages
            .get(&(query.to_string(), sort.as_str()))
            .map(|posts| posts.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

fn post(id: &str, title: &str, body: &str) -> RawPost {
    RawPost::new(title, body).with_meta(PostMeta {
        id: Some(id.to_string()),
        score: Some(10),
        ..PostMeta::default()
    })
}

/// Mimics the analyze command: fetch, then score.
fn analyze(fetcher: &PostFetcher<CannedReddit>, ticker: &str, subreddit: &str) -> Result<pulse::AggregateReport> {
    let posts = fetcher.fetch_posts(ticker, subreddit)?;
    let pipeline = SentimentPipeline::builtin()?;
    Ok(pipeline.analyze(&posts)?)
}

#[test]
fn fetched_posts_flow_through_the_pipeline() -> Result<()> {
    // Arrange: top and new listings sharing one post, plus a company-name hit
    let reddit = CannedReddit::new()
        .with(
            "GME",
            SearchSort::Top,
            vec![
                post("1", "GME to the moon 🚀", "great squeeze, very bullish"),
                post("2", "GME bagholders", "this is a disaster"),
            ],
        )
        .with("GameStop", SearchSort::Top, vec![post("3", "GameStop earnings", "")])
        .with(
            "GME",
            SearchSort::New,
            vec![post("2", "GME bagholders", "this is a disaster")],
        );
    let fetcher = PostFetcher::new(reddit).limit(5);

    // Act
    let report = analyze(&fetcher, "GME", "wallstreetbets")?;

    // Assert: duplicate "2" is analyzed once, order is top then new
    assert_eq!(report.total_posts(), 3);
    let ids: Vec<_> = report
        .results()
        .iter()
        .map(|r| r.meta().id.clone().unwrap_or_default())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(report.results()[0].label(), SentimentLabel::Positive);
    assert_eq!(report.results()[1].label(), SentimentLabel::Negative);

    Ok(())
}

#[test]
fn query_without_posts_gives_empty_report() -> Result<()> {
    let fetcher = PostFetcher::new(CannedReddit::new());
    let report = analyze(&fetcher, "NOK", "stocks")?;

    assert!(report.is_empty());
    assert_eq!(report.mean_compound(), 0.0);

    Ok(())
}

#[test]
#[serial]
fn client_requires_credentials() {
    unsafe {
        std::env::remove_var("REDDIT_CLIENT_ID");
        std::env::remove_var("REDDIT_CLIENT_SECRET");
        std::env::remove_var("REDDIT_USER_AGENT");
    }

    let err = RedditClientBuilder::new().build().err().unwrap();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("REDDIT_CLIENT_ID"));
}

#[test]
#[serial]
fn client_reads_overrides_from_environment() {
    unsafe {
        std::env::set_var("REDDIT_CLIENT_ID", "id");
        std::env::set_var("REDDIT_CLIENT_SECRET", "secret");
        std::env::set_var("REDDIT_USER_AGENT", "pulse-tests/0.1");
        std::env::set_var("REDDIT_BASE_URL", "http://127.0.0.1:9");
        std::env::set_var("REDDIT_AUTH_URL", "http://127.0.0.1:9");
    }

    let client = RedditClientBuilder::new().build().unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:9");
    assert_eq!(client.auth_url(), "http://127.0.0.1:9");

    unsafe {
        for var in [
            "REDDIT_CLIENT_ID",
            "REDDIT_CLIENT_SECRET",
            "REDDIT_USER_AGENT",
            "REDDIT_BASE_URL",
            "REDDIT_AUTH_URL",
        ] {
            std::env::remove_var(var);
        }
    }
}
