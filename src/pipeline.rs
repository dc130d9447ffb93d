//! Normalize, score and aggregate a batch of posts.

use thiserror::Error;

use crate::aggregator::{aggregate, score_post};
use crate::models::{AggregateReport, InputError, RawPost, SentimentResult};
use crate::normalizer::TextNormalizer;
use crate::scoring::{LexiconScorer, PolarityScorer, ScoringError};

/// Errors raised while analyzing a batch of posts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Runs posts through cleaning, scoring and aggregation.
///
/// The pipeline owns only its scorer and keeps no state between calls, so a
/// single instance can serve concurrent queries.
///
/// # Examples
///
/// ```
/// use pulse::models::RawPost;
/// use pulse::pipeline::SentimentPipeline;
///
/// let pipeline = SentimentPipeline::builtin()?;
/// let posts = vec![
///     RawPost::new("AMD is looking great", ""),
///     RawPost::new("AMD earnings were a disaster", "worst quarter in years"),
/// ];
/// let report = pipeline.analyze(&posts)?;
///
/// assert_eq!(report.total_posts(), 2);
/// assert_eq!(report.counts_by_label().positive, 1);
/// assert_eq!(report.counts_by_label().negative, 1);
/// # Ok::<(), pulse::pipeline::PipelineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SentimentPipeline<S = LexiconScorer> {
    scorer: S,
}

impl SentimentPipeline<LexiconScorer> {
    /// Pipeline over the bundled lexicon.
    pub fn builtin() -> Result<Self, ScoringError> {
        Ok(Self::new(LexiconScorer::builtin()?))
    }
}

impl<S: PolarityScorer> SentimentPipeline<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Cleans and scores a single post, carrying its metadata over.
    pub fn score(&self, post: &RawPost) -> Result<SentimentResult, ScoringError> {
        let text = TextNormalizer::normalize(post);
        Ok(score_post(&self.scorer, &text)?.with_meta(post.meta.clone()))
    }

    /// Analyzes posts in order. Fails on the first scoring error; no
    /// partial report is produced.
    pub fn analyze(&self, posts: &[RawPost]) -> Result<AggregateReport, PipelineError> {
        let results = posts
            .iter()
            .map(|post| self.score(post))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(aggregate(results))
    }

    /// Parses a JSON array of post records and analyzes it.
    ///
    /// Malformed records are rejected before any text is scored.
    pub fn analyze_json(&self, json: &str) -> Result<AggregateReport, PipelineError> {
        let posts = RawPost::parse_list(json)?;
        self.analyze(&posts)
    }
}
