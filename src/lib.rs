pub mod aggregator;
pub mod catalog;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod reddit;
pub mod render;
pub mod scoring;

pub use aggregator::{aggregate, score_post};
pub use models::{AggregateReport, RawPost, SentimentLabel, SentimentResult};
pub use normalizer::{NormalizedText, TextNormalizer};
pub use pipeline::{PipelineError, SentimentPipeline};
pub use scoring::{LexiconScorer, PolarityScorer, ScoringError};
