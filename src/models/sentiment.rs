use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PostMeta;

/// Compound scores at or above this value are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound scores at or below this value are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Discrete sentiment bucket for a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// All labels in display order.
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Buckets a compound score.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse::models::SentimentLabel;
    ///
    /// assert_eq!(SentimentLabel::from_compound(0.05), SentimentLabel::Positive);
    /// assert_eq!(SentimentLabel::from_compound(0.049), SentimentLabel::Neutral);
    /// assert_eq!(SentimentLabel::from_compound(-0.05), SentimentLabel::Negative);
    /// ```
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// Reasons a `SentimentResult` cannot be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidResultError {
    #[error("compound score is not a finite number")]
    NotFinite,

    #[error("compound score {0} is outside [-1.0, 1.0]")]
    OutOfRange(f64),

    #[error("label {label} does not match compound score {compound}")]
    LabelMismatch {
        label: SentimentLabel,
        compound: f64,
    },
}

/// Sentiment of one post.
///
/// The label is always derived from the compound score, so a constructed
/// result can never disagree with the classification thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SentimentRecord")]
pub struct SentimentResult {
    source_text: String,
    compound: f64,
    label: SentimentLabel,
    #[serde(default, skip_serializing_if = "PostMeta::is_empty")]
    meta: PostMeta,
}

impl SentimentResult {
    /// Creates a result for the given cleaned text and compound score.
    ///
    /// # Errors
    ///
    /// Returns an error if `compound` is NaN, infinite, or outside [-1.0, 1.0].
    pub fn new(source_text: impl Into<String>, compound: f64) -> Result<Self, InvalidResultError> {
        if !compound.is_finite() {
            return Err(InvalidResultError::NotFinite);
        }
        if !(-1.0..=1.0).contains(&compound) {
            return Err(InvalidResultError::OutOfRange(compound));
        }

        Ok(Self {
            source_text: source_text.into(),
            compound,
            label: SentimentLabel::from_compound(compound),
            meta: PostMeta::default(),
        })
    }

    /// Attaches the metadata of the post this result was computed from.
    pub fn with_meta(mut self, meta: PostMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn compound(&self) -> f64 {
        self.compound
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn meta(&self) -> &PostMeta {
        &self.meta
    }

    /// The cleaned text cut to `max_chars` characters, with `...` appended
    /// when something was cut.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse::models::SentimentResult;
    ///
    /// let result = SentimentResult::new("buy the dip", 0.0).unwrap();
    /// assert_eq!(result.excerpt(3), "buy...");
    /// assert_eq!(result.excerpt(50), "buy the dip");
    /// ```
    pub fn excerpt(&self, max_chars: usize) -> String {
        match self.source_text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &self.source_text[..cut]),
            None => self.source_text.clone(),
        }
    }
}

/// Unchecked wire shape of a `SentimentResult`.
#[derive(Deserialize)]
struct SentimentRecord {
    source_text: String,
    compound: f64,
    label: SentimentLabel,
    #[serde(default)]
    meta: PostMeta,
}

impl TryFrom<SentimentRecord> for SentimentResult {
    type Error = InvalidResultError;

    fn try_from(record: SentimentRecord) -> Result<Self, Self::Error> {
        let result = Self::new(record.source_text, record.compound)?.with_meta(record.meta);
        if result.label != record.label {
            return Err(InvalidResultError::LabelMismatch {
                label: record.label,
                compound: record.compound,
            });
        }
        Ok(result)
    }
}
