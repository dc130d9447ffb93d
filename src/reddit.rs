/// Reddit fetching module.
///
/// This module provides a blocking HTTP client for Reddit's search API,
/// including app-only authentication, listing parsing, and the post
/// collection that expands a ticker into its search variations.
mod client;
mod fetcher;
mod listing;

pub use client::{
    RedditApi, RedditClient, RedditClientBuilder, RedditError, SearchSort, is_valid_subreddit,
};
pub use fetcher::{DEFAULT_LIMIT, PostFetcher};
