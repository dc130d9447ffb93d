use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

/// Errors raised while reading raw post records.
#[derive(Debug, Error)]
pub enum InputError {
    /// The payload as a whole could not be read as a list of posts.
    #[error("Malformed post list: {0}")]
    Malformed(#[source] serde_json::Error),

    /// A single record in the list has the wrong shape.
    #[error("Malformed post record at index {index}: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Metadata that travels with a post untouched by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Platform identifier, used to drop duplicates across searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Net upvotes at fetch time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    /// Link to the post (or to the page it links out to).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the post was created.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_utc: Option<OffsetDateTime>,
    /// Number of comments at fetch time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<u64>,
}

impl PostMeta {
    /// Returns true when no metadata field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A post as handed over by the fetching side.
///
/// `title` is required; `body` defaults to the empty string and also accepts
/// the `text` key used by exported post dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    pub title: String,
    #[serde(default, alias = "text")]
    pub body: String,
    #[serde(flatten)]
    pub meta: PostMeta,
}

impl RawPost {
    /// Creates a post with no metadata.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            meta: PostMeta::default(),
        }
    }

    /// Attaches pass-through metadata.
    pub fn with_meta(mut self, meta: PostMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Title and body joined by a single space.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }

    /// Parses a JSON array of post records.
    ///
    /// Each record is checked on its own so the error names the offending
    /// index.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse::models::RawPost;
    ///
    /// let posts = RawPost::parse_list(r#"[{"title": "TSLA to the moon", "body": ""}]"#).unwrap();
    /// assert_eq!(posts[0].title, "TSLA to the moon");
    ///
    /// assert!(RawPost::parse_list(r#"[{"body": "no title"}]"#).is_err());
    /// ```
    pub fn parse_list(json: &str) -> Result<Vec<RawPost>, InputError> {
        let records: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(InputError::Malformed)?;

        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                serde_json::from_value(record)
                    .map_err(|source| InputError::MalformedRecord { index, source })
            })
            .collect()
    }
}
