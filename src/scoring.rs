//! Sentiment polarity scoring.
//!
//! [`PolarityScorer`] is the seam between the pipeline and whatever produces
//! compound scores. [`LexiconScorer`] is the bundled implementation; tests and
//! callers can plug in their own.
//!
//! # Examples
//!
//! ```
//! use pulse::scoring::{LexiconScorer, PolarityScorer};
//!
//! let scorer = LexiconScorer::builtin()?;
//! let compound = scorer.score("Really strong quarter, very bullish!")?;
//! assert!(compound > 0.05);
//! # Ok::<(), pulse::scoring::ScoringError>(())
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::models::InvalidResultError;

mod engine;
mod lexicon;

pub use engine::{LexiconScorer, PolarityScores};
pub use lexicon::{Lexicon, LexiconParseError, MAX_VALENCE};

/// Errors raised by a polarity scorer.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The lexicon file could not be read.
    #[error("Lexicon unavailable at {}: {source}", .path.display())]
    LexiconUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The lexicon could be read but not parsed.
    #[error("Malformed lexicon: {0}")]
    MalformedLexicon(#[from] LexiconParseError),

    /// The scorer returned a value that is not a valid compound score.
    #[error("Scorer returned an invalid score: {0}")]
    InvalidScore(#[from] InvalidResultError),

    /// Failure reported by an external scoring backend.
    #[error("Scoring backend failed: {message}")]
    Backend { message: String },
}

/// Maps text to a compound polarity score in [-1.0, 1.0].
///
/// Implementations must be deterministic and must not carry mutable state
/// between calls.
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<f64, ScoringError>;
}

impl<S: PolarityScorer + ?Sized> PolarityScorer for Arc<S> {
    fn score(&self, text: &str) -> Result<f64, ScoringError> {
        (**self).score(text)
    }
}

impl<S: PolarityScorer + ?Sized> PolarityScorer for Box<S> {
    fn score(&self, text: &str) -> Result<f64, ScoringError> {
        (**self).score(text)
    }
}
