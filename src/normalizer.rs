//! Text cleaning applied to a post before it is scored.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::RawPost;

/// Unicode ranges treated as emoji or pictographic noise.
///
/// Characters in these ranges are deleted outright (no space is left
/// behind). Bounds are inclusive.
pub const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F680, 0x1F6FF), // transport & map
    (0x1F1E0, 0x1F1FF), // flags
    (0x2702, 0x27B0),   // dingbats
    (0x24C2, 0x1F251),  // enclosed characters
    (0x1F900, 0x1F9FF), // supplemental symbols & pictographs
    (0x1FA00, 0x1FA6F), // chess symbols
    (0x2600, 0x26FF),   // miscellaneous symbols
    (0x2700, 0x27BF),   // dingbats
];

/// ASCII punctuation that survives cleaning.
const KEPT_PUNCTUATION: &[char] = &['.', ',', '!', '?', '\'', '-', '$', '%'];

static PATTERNS: OnceLock<NoisePatterns> = OnceLock::new();

struct NoisePatterns {
    url: Regex,
    mention: Regex,
}

impl NoisePatterns {
    fn new() -> Self {
        Self {
            url: Regex::new(r"(?i)(?:https?://|www\.)\S+").expect("url regex must compile"),
            mention: Regex::new(r"\b[ru]/\w+").expect("mention regex must compile"),
        }
    }
}

fn patterns() -> &'static NoisePatterns {
    PATTERNS.get_or_init(NoisePatterns::new)
}

/// Cleaned post text ready for scoring.
///
/// Only [`TextNormalizer`] creates values of this type, so holding one means
/// the text went through cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips URLs, mentions, emoji and symbol clutter from post text.
///
/// Case is left alone: the scorer reads all-caps words as emphasis.
pub struct TextNormalizer;

impl TextNormalizer {
    /// Cleans the title and body of a post.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse::models::RawPost;
    /// use pulse::normalizer::TextNormalizer;
    ///
    /// let post = RawPost::new("TSLA 🚀🚀 to the MOON", "see https://example.com/dd");
    /// assert_eq!(TextNormalizer::normalize(&post).as_str(), "TSLA to the MOON see");
    /// ```
    #[must_use]
    pub fn normalize(post: &RawPost) -> NormalizedText {
        Self::normalize_text(&post.combined_text())
    }

    /// Cleans arbitrary text.
    ///
    /// # Cleaning steps
    ///
    /// - Removes URLs (`http://`, `https://` and `www.` prefixed tokens)
    /// - Removes `r/subreddit` and `u/user` mentions
    /// - Deletes characters in [`EMOJI_RANGES`]
    /// - Replaces anything other than ASCII letters, digits, whitespace and
    ///   `. , ! ? ' - $ %` with a space
    /// - Collapses whitespace runs to one space and trims the ends
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse::normalizer::TextNormalizer;
    ///
    /// assert_eq!(TextNormalizer::normalize_text("  GME   is   GREAT!!  ").as_str(), "GME is GREAT!!");
    /// assert_eq!(TextNormalizer::normalize_text("per u/someone in r/stocks").as_str(), "per in");
    /// assert_eq!(TextNormalizer::normalize_text("*** (#) ***").as_str(), "");
    /// ```
    #[must_use]
    pub fn normalize_text(text: &str) -> NormalizedText {
        let patterns = patterns();
        let without_urls = patterns.url.replace_all(text, "");
        let without_mentions = patterns.mention.replace_all(&without_urls, "");

        let cleaned: String = without_mentions
            .chars()
            .filter(|c| !is_emoji(*c))
            .map(|c| if is_kept(c) { c } else { ' ' })
            .collect();

        NormalizedText(cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Cleans a post. Shorthand for [`TextNormalizer::normalize`].
#[must_use]
pub fn normalize(post: &RawPost) -> NormalizedText {
    TextNormalizer::normalize(post)
}

fn is_emoji(c: char) -> bool {
    let code = u32::from(c);
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || KEPT_PUNCTUATION.contains(&c)
}
