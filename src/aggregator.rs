//! Per-post scoring and per-query aggregation.

use crate::models::{AggregateReport, LabelCounts, SentimentResult};
use crate::normalizer::NormalizedText;
use crate::scoring::{PolarityScorer, ScoringError};

/// Scores one cleaned text and classifies it.
///
/// A score outside [-1.0, 1.0] from the scorer is surfaced as
/// [`ScoringError::InvalidScore`].
///
/// # Examples
///
/// ```
/// use pulse::aggregator::score_post;
/// use pulse::models::SentimentLabel;
/// use pulse::normalizer::TextNormalizer;
/// use pulse::scoring::LexiconScorer;
///
/// let scorer = LexiconScorer::builtin()?;
/// let text = TextNormalizer::normalize_text("Terrible earnings, stock is tanking");
/// let result = score_post(&scorer, &text)?;
/// assert_eq!(result.label(), SentimentLabel::Negative);
/// # Ok::<(), pulse::scoring::ScoringError>(())
/// ```
pub fn score_post<S>(scorer: &S, text: &NormalizedText) -> Result<SentimentResult, ScoringError>
where
    S: PolarityScorer + ?Sized,
{
    let compound = scorer.score(text.as_str())?;
    Ok(SentimentResult::new(text.as_str(), compound)?)
}

/// Folds per-post results into a report.
///
/// Result order is kept as given. An empty input yields an empty report
/// with a mean of 0.0.
///
/// # Examples
///
/// ```
/// use pulse::aggregator::aggregate;
/// use pulse::models::SentimentResult;
///
/// let results = vec![
///     SentimentResult::new("a", 0.6).unwrap(),
///     SentimentResult::new("b", -0.2).unwrap(),
/// ];
/// let report = aggregate(results);
/// assert_eq!(report.total_posts(), 2);
/// assert!((report.mean_compound() - 0.2).abs() < 1e-9);
/// ```
pub fn aggregate(results: Vec<SentimentResult>) -> AggregateReport {
    let mut counts = LabelCounts::default();
    let mut total_compound = 0.0;
    let mut max_compound: Option<f64> = None;
    let mut min_compound: Option<f64> = None;

    for result in &results {
        let compound = result.compound();
        counts.increment(result.label());
        total_compound += compound;
        max_compound = Some(max_compound.map_or(compound, |max| max.max(compound)));
        min_compound = Some(min_compound.map_or(compound, |min| min.min(compound)));
    }

    let mean_compound = if results.is_empty() {
        0.0
    } else {
        total_compound / results.len() as f64
    };

    AggregateReport {
        total_posts: results.len(),
        counts_by_label: counts,
        mean_compound,
        max_compound,
        min_compound,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;
    use crate::normalizer::TextNormalizer;

    struct FixedScorer(f64);

    impl PolarityScorer for FixedScorer {
        fn score(&self, _text: &str) -> Result<f64, ScoringError> {
            Ok(self.0)
        }
    }

    struct BrokenScorer;

    impl PolarityScorer for BrokenScorer {
        fn score(&self, _text: &str) -> Result<f64, ScoringError> {
            Err(ScoringError::Backend {
                message: "lexicon offline".to_string(),
            })
        }
    }

    fn result(compound: f64) -> SentimentResult {
        SentimentResult::new(format!("post {compound}"), compound).unwrap()
    }

    #[test]
    fn score_post_classifies_with_thresholds() {
        let text = TextNormalizer::normalize_text("whatever");
        assert_eq!(
            score_post(&FixedScorer(0.05), &text).unwrap().label(),
            SentimentLabel::Positive
        );
        assert_eq!(
            score_post(&FixedScorer(0.0), &text).unwrap().label(),
            SentimentLabel::Neutral
        );
        assert_eq!(
            score_post(&FixedScorer(-0.05), &text).unwrap().label(),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn score_post_keeps_cleaned_text() {
        let text = TextNormalizer::normalize_text("  hello   world ");
        let result = score_post(&FixedScorer(0.0), &text).unwrap();
        assert_eq!(result.source_text(), "hello world");
    }

    #[test]
    fn score_post_rejects_out_of_range_score() {
        let text = TextNormalizer::normalize_text("x");
        let err = score_post(&FixedScorer(1.5), &text).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidScore(_)));
    }

    #[test]
    fn score_post_surfaces_scorer_failure() {
        let text = TextNormalizer::normalize_text("x");
        let err = score_post(&BrokenScorer, &text).unwrap_err();
        assert!(err.to_string().contains("lexicon offline"));
    }

    #[test]
    fn aggregate_empty_input() {
        let report = aggregate(Vec::new());
        assert_eq!(report.total_posts(), 0);
        assert_eq!(*report.counts_by_label(), LabelCounts::default());
        assert_eq!(report.mean_compound(), 0.0);
        assert_eq!(report.max_compound(), None);
        assert_eq!(report.min_compound(), None);
        assert!(report.results().is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn aggregate_mean_of_mixed_scores() {
        let report = aggregate(vec![result(0.6), result(-0.2), result(0.0)]);
        assert!((report.mean_compound() - 0.4 / 3.0).abs() < 1e-12);
        assert_eq!(report.max_compound(), Some(0.6));
        assert_eq!(report.min_compound(), Some(-0.2));
    }

    #[test]
    fn aggregate_counts_every_label() {
        let report = aggregate(vec![
            result(0.9),
            result(0.3),
            result(0.01),
            result(-0.7),
        ]);
        let counts = report.counts_by_label();
        assert_eq!(counts.positive, 2);
        assert_eq!(counts.neutral, 1);
        assert_eq!(counts.negative, 1);
        assert_eq!(counts.total(), report.total_posts());
        assert_eq!(report.total_posts(), report.results().len());
    }

    #[test]
    fn aggregate_preserves_order() {
        let input = vec![result(-0.5), result(0.9), result(0.0), result(0.2)];
        let report = aggregate(input.clone());
        assert_eq!(report.results(), input.as_slice());
    }
}
