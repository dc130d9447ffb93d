use std::collections::HashSet;

use tracing::{debug, info};

use crate::catalog::search_terms;
use crate::models::RawPost;

use super::client::{RedditApi, RedditError, SearchSort};

/// Posts collected per sort order when no limit is configured.
pub const DEFAULT_LIMIT: usize = 5;

/// Collects posts about a stock from one subreddit.
///
/// Each query is expanded into its search variations (ticker and company
/// name), and posts are deduplicated by id across all searches. Posts
/// without an id are always kept.
///
/// # Examples
///
/// ```no_run
/// use pulse::reddit::{PostFetcher, RedditClientBuilder};
///
/// let client = RedditClientBuilder::new().build()?;
/// let posts = PostFetcher::new(client).limit(10).fetch_posts("TSLA", "stocks")?;
/// println!("collected {} posts", posts.len());
/// # Ok::<(), pulse::reddit::RedditError>(())
/// ```
pub struct PostFetcher<A> {
    api: A,
    limit: usize,
}

impl<A: RedditApi> PostFetcher<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Sets how many posts are collected per sort order.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Searches every variation of `query`, stopping once `limit` unique
    /// posts are collected.
    pub fn search_posts(
        &self,
        subreddit: &str,
        query: &str,
        limit: usize,
        sort: SearchSort,
    ) -> Result<Vec<RawPost>, RedditError> {
        let mut seen = HashSet::new();
        let mut posts = Vec::new();

        for term in search_terms(query) {
            if posts.len() >= limit {
                break;
            }
            let found = self.api.search(subreddit, &term, sort, limit)?;
            debug!(subreddit, term = %term, found = found.len(), "search variation done");

            for post in found {
                if posts.len() >= limit {
                    break;
                }
                if is_new(&mut seen, &post) {
                    posts.push(post);
                }
            }
        }

        Ok(posts)
    }

    /// Top posts of the past month followed by the newest posts, without
    /// duplicates. The first occurrence of a post wins.
    pub fn fetch_posts(&self, ticker: &str, subreddit: &str) -> Result<Vec<RawPost>, RedditError> {
        let top = self.search_posts(subreddit, ticker, self.limit, SearchSort::Top)?;
        let new = self.search_posts(subreddit, ticker, self.limit, SearchSort::New)?;

        let mut seen = HashSet::new();
        let posts: Vec<RawPost> = top
            .into_iter()
            .chain(new)
            .filter(|post| is_new(&mut seen, post))
            .collect();

        info!(ticker, subreddit, count = posts.len(), "collected posts");
        Ok(posts)
    }
}

fn is_new(seen: &mut HashSet<String>, post: &RawPost) -> bool {
    match &post.meta.id {
        Some(id) => seen.insert(id.clone()),
        None => true,
    }
}
