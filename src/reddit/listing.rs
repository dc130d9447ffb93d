use serde::Deserialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::models::{PostMeta, RawPost};

use super::client::RedditError;

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Deserialize)]
struct Thing {
    kind: String,
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct Link {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    num_comments: Option<u64>,
    #[serde(default)]
    created_utc: Option<f64>,
}

impl From<Link> for RawPost {
    fn from(link: Link) -> Self {
        let created_utc = link
            .created_utc
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs as i64).ok());

        RawPost::new(link.title, link.selftext).with_meta(PostMeta {
            id: link.id,
            score: link.score,
            url: link.url,
            created_utc,
            num_comments: link.num_comments,
        })
    }
}

/// Converts a search listing into posts, in listing order.
///
/// Only link entries (`t3`) are kept. Link entries that lack a title are
/// skipped with a warning rather than failing the whole page.
pub(crate) fn parse_listing(body: &str) -> Result<Vec<RawPost>, RedditError> {
    let listing: Listing = serde_json::from_str(body).map_err(RedditError::Parse)?;

    let posts = listing
        .data
        .children
        .into_iter()
        .filter(|thing| thing.kind == "t3")
        .filter_map(|thing| match serde_json::from_value::<Link>(thing.data) {
            Ok(link) => Some(RawPost::from(link)),
            Err(e) => {
                warn!(error = %e, "skipping unreadable listing entry");
                None
            }
        })
        .collect();

    Ok(posts)
}
