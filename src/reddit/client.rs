/// Reddit HTTP client implementation.
///
/// This module provides `RedditClient` for making synchronous, app-only
/// authenticated search requests against the Reddit API, along with the error
/// type and the builder used to configure it.
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::RawPost;

use super::listing::parse_listing;

const DEFAULT_BASE_URL: &str = "https://oauth.reddit.com";
const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";

/// Token lifetime assumed when the token endpoint does not report one.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Tokens are renewed this long before Reddit would expire them.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Errors that can occur when talking to the Reddit API.
#[derive(Debug, Error)]
pub enum RedditError {
    /// Network-related errors (connection failures, DNS resolution, timeouts)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Reddit refused the credentials or the access token
    #[error("Reddit authentication failed: {message}")]
    Auth { message: String },

    /// The response body was not the expected JSON
    #[error("Unexpected response: {0}")]
    Parse(#[source] serde_json::Error),

    /// A required credential was neither set on the builder nor in the environment
    #[error("Missing credential: set {0}")]
    MissingCredential(&'static str),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Subreddit names are limited to letters, digits and underscores
    #[error("Invalid subreddit name: '{0}'")]
    InvalidSubreddit(String),
}

impl RedditError {
    /// True for errors the user fixes through configuration or input rather
    /// than by retrying later.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential(_)
                | Self::InvalidUrl(_)
                | Self::InvalidSubreddit(_)
                | Self::Auth { .. }
        )
    }
}

/// Whether `name` can be used as a subreddit in a request path.
///
/// # Examples
///
/// ```
/// use pulse::reddit::is_valid_subreddit;
///
/// assert!(is_valid_subreddit("wallstreetbets"));
/// assert!(!is_valid_subreddit("stocks/../api"));
/// assert!(!is_valid_subreddit(""));
/// ```
pub fn is_valid_subreddit(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Sort order for subreddit search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    /// Highest scoring posts from the past month.
    Top,
    /// Most recent posts.
    New,
}

impl SearchSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::New => "new",
        }
    }

    /// Time window sent along with the sort, if any.
    pub fn time_filter(self) -> Option<&'static str> {
        match self {
            Self::Top => Some("month"),
            Self::New => None,
        }
    }
}

/// Trait for Reddit search operations.
///
/// This trait enables stubbing in unit tests and keeps the post-collection
/// logic independent of HTTP.
pub trait RedditApi: Send + Sync {
    /// Searches `subreddit` for `query`, returning at most `limit` posts in
    /// the order Reddit lists them.
    fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: SearchSort,
        limit: usize,
    ) -> Result<Vec<RawPost>, RedditError>;
}

/// Builder for constructing `RedditClient` instances.
///
/// # Examples
///
/// ```
/// use pulse::reddit::RedditClientBuilder;
///
/// let client = RedditClientBuilder::new()
///     .client_id("my-app-id")
///     .client_secret("my-app-secret")
///     .user_agent("pulse/0.1 by someone")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "https://oauth.reddit.com");
/// ```
#[derive(Debug, Default)]
pub struct RedditClientBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: Option<String>,
    base_url: Option<String>,
    auth_url: Option<String>,
}

impl RedditClientBuilder {
    /// Creates a new `RedditClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OAuth application id.
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Sets the OAuth application secret.
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Sets the User-Agent header Reddit requires on every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Sets the API base URL (e.g., "https://oauth.reddit.com").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the URL serving `/api/v1/access_token` (e.g., "https://www.reddit.com").
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = Some(url.into());
        self
    }

    /// Builds the `RedditClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Values not set on the builder are read from `REDDIT_CLIENT_ID`,
    /// `REDDIT_CLIENT_SECRET` and `REDDIT_USER_AGENT` (required), and from
    /// `REDDIT_BASE_URL` and `REDDIT_AUTH_URL` (optional).
    ///
    /// # Errors
    ///
    /// Returns `RedditError::MissingCredential` naming the first missing
    /// variable, or `RedditError::InvalidUrl` if a URL does not parse.
    pub fn build(self) -> Result<RedditClient, RedditError> {
        let client_id = resolve(self.client_id, "REDDIT_CLIENT_ID")
            .ok_or(RedditError::MissingCredential("REDDIT_CLIENT_ID"))?;
        let client_secret = resolve(self.client_secret, "REDDIT_CLIENT_SECRET")
            .ok_or(RedditError::MissingCredential("REDDIT_CLIENT_SECRET"))?;
        let user_agent = resolve(self.user_agent, "REDDIT_USER_AGENT")
            .ok_or(RedditError::MissingCredential("REDDIT_USER_AGENT"))?;

        let base_url = resolve(self.base_url, "REDDIT_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let auth_url = resolve(self.auth_url, "REDDIT_AUTH_URL")
            .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());

        for url in [&base_url, &auth_url] {
            reqwest::Url::parse(url)
                .map_err(|e| RedditError::InvalidUrl(format!("{}: {}", url, e)))?;
        }

        let http = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(RedditError::Network)?;

        Ok(RedditClient {
            http,
            client_id,
            client_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }
}

/// Builder value first, then the environment. Blank values count as unset.
fn resolve(value: Option<String>, var: &str) -> Option<String> {
    value
        .or_else(|| std::env::var(var).ok())
        .filter(|v| !v.trim().is_empty())
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
}

/// An access token and the moment it should no longer be used.
#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn issued_now(value: String, lifetime: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN),
        }
    }

    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Synchronous client for Reddit's search API.
///
/// Authenticates with the client-credentials grant on first use and reuses
/// the token until shortly before it expires. A token rejected by the search
/// endpoint is dropped, so the next call authenticates again. It should be
/// constructed using `RedditClientBuilder`.
pub struct RedditClient {
    http: reqwest::blocking::Client,
    client_id: String,
    client_secret: String,
    base_url: String,
    auth_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    /// Returns the API base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the token endpoint host configured for this client.
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    fn token_cache(&self) -> Result<std::sync::MutexGuard<'_, Option<CachedToken>>, RedditError> {
        self.token.lock().map_err(|_| RedditError::Auth {
            message: "token cache poisoned".to_string(),
        })
    }

    fn access_token(&self) -> Result<String, RedditError> {
        let mut cached = self.token_cache()?;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let url = format!("{}/api/v1/access_token", self.auth_url);
        debug!(%url, "requesting reddit access token");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .map_err(RedditError::Network)?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(RedditError::Auth {
                message: format!("token endpoint returned {}", status.as_u16()),
            });
        }
        if !status.is_success() {
            return Err(RedditError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(RedditError::Network)?;
        let token = parse_token(&body)?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn forget_token(&self) -> Result<(), RedditError> {
        *self.token_cache()? = None;
        Ok(())
    }
}

fn parse_token(body: &str) -> Result<CachedToken, RedditError> {
    let parsed: TokenResponse = serde_json::from_str(body).map_err(RedditError::Parse)?;
    let lifetime = parsed
        .expires_in
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TOKEN_LIFETIME);
    match (parsed.access_token, parsed.error) {
        (Some(token), _) => Ok(CachedToken::issued_now(token, lifetime)),
        (None, Some(error)) => Err(RedditError::Auth { message: error }),
        (None, None) => Err(RedditError::Auth {
            message: "token response carried no access_token".to_string(),
        }),
    }
}

impl RedditApi for RedditClient {
    fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: SearchSort,
        limit: usize,
    ) -> Result<Vec<RawPost>, RedditError> {
        if !is_valid_subreddit(subreddit) {
            return Err(RedditError::InvalidSubreddit(subreddit.to_string()));
        }

        let token = self.access_token()?;
        let url = format!("{}/r/{}/search", self.base_url, subreddit);
        let limit_param = limit.to_string();

        let mut params = vec![
            ("q", query),
            ("restrict_sr", "1"),
            ("sort", sort.as_str()),
            ("limit", limit_param.as_str()),
            ("raw_json", "1"),
        ];
        if let Some(window) = sort.time_filter() {
            params.push(("t", window));
        }

        debug!(%url, query, sort = sort.as_str(), limit, "searching subreddit");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .map_err(RedditError::Network)?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            self.forget_token()?;
            return Err(RedditError::Auth {
                message: format!("search rejected the access token ({})", status.as_u16()),
            });
        }
        if !status.is_success() {
            return Err(RedditError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(RedditError::Network)?;
        let mut posts = parse_listing(&body)?;
        posts.truncate(limit);
        Ok(posts)
    }
}
