use serde::Serialize;

use super::{SentimentLabel, SentimentResult};

/// Number of results per sentiment label.
///
/// Every label is always present; absent labels count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl LabelCounts {
    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    pub(crate) fn increment(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    /// Sum over all labels.
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// `(label, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, usize)> + '_ {
        SentimentLabel::ALL.into_iter().map(|label| (label, self.get(label)))
    }
}

/// Per-query summary of post sentiment.
///
/// Built by [`crate::aggregator::aggregate`], which guarantees
/// `total_posts == results.len() == counts_by_label.total()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub(crate) total_posts: usize,
    pub(crate) counts_by_label: LabelCounts,
    pub(crate) mean_compound: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_compound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) min_compound: Option<f64>,
    pub(crate) results: Vec<SentimentResult>,
}

impl AggregateReport {
    pub fn total_posts(&self) -> usize {
        self.total_posts
    }

    pub fn counts_by_label(&self) -> &LabelCounts {
        &self.counts_by_label
    }

    /// Mean compound score, 0.0 for an empty report.
    pub fn mean_compound(&self) -> f64 {
        self.mean_compound
    }

    pub fn max_compound(&self) -> Option<f64> {
        self.max_compound
    }

    pub fn min_compound(&self) -> Option<f64> {
        self.min_compound
    }

    /// Per-post results in the order the posts were supplied.
    pub fn results(&self) -> &[SentimentResult] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.total_posts == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_counts_default_to_zero_for_every_label() {
        let counts = LabelCounts::default();
        for (_, count) in counts.iter() {
            assert_eq!(count, 0);
        }
        assert_eq!(counts.iter().count(), 3);
    }

    #[test]
    fn increment_touches_only_the_given_label() {
        let mut counts = LabelCounts::default();
        counts.increment(SentimentLabel::Negative);
        counts.increment(SentimentLabel::Negative);
        counts.increment(SentimentLabel::Positive);

        assert_eq!(counts.get(SentimentLabel::Negative), 2);
        assert_eq!(counts.get(SentimentLabel::Positive), 1);
        assert_eq!(counts.get(SentimentLabel::Neutral), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn label_counts_serialize_with_all_keys() {
        let json = serde_json::to_value(LabelCounts::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"positive": 0, "neutral": 0, "negative": 0})
        );
    }
}
