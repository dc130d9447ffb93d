//! Human-readable and JSON output for a query report.

use std::fmt;

use serde::Serialize;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::models::{AggregateReport, SentimentResult};

/// Characters of cleaned text shown per post.
pub const EXCERPT_CHARS: usize = 300;

/// A report together with the query that produced it.
///
/// Reports built from a local post file carry no query.
#[derive(Debug, Serialize)]
pub struct QueryReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<&'a str>,
    #[serde(flatten)]
    pub report: &'a AggregateReport,
}

impl<'a> QueryReport<'a> {
    pub fn new(ticker: &'a str, subreddit: &'a str, report: &'a AggregateReport) -> Self {
        Self {
            ticker: Some(ticker),
            subreddit: Some(subreddit),
            report,
        }
    }

    /// A report with no ticker or subreddit attached.
    pub fn standalone(report: &'a AggregateReport) -> Self {
        Self {
            ticker: None,
            subreddit: None,
            report,
        }
    }

    /// Pretty-printed JSON of the query and the full report.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Plain-text rendering: a summary block followed by one entry per post.
///
/// # Examples
///
/// ```
/// use pulse::aggregator::aggregate;
/// use pulse::models::SentimentResult;
/// use pulse::render::QueryReport;
///
/// let report = aggregate(vec![SentimentResult::new("GME to the moon", 0.6).unwrap()]);
/// let text = QueryReport::new("GME", "wallstreetbets", &report).to_string();
///
/// assert!(text.contains("GME in r/wallstreetbets"));
/// assert!(text.contains("Average compound: 0.600"));
/// ```
impl fmt::Display for QueryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let counts = report.counts_by_label();

        match (self.ticker, self.subreddit) {
            (Some(ticker), Some(subreddit)) => {
                writeln!(f, "Sentiment for {ticker} in r/{subreddit}")?
            }
            _ => writeln!(f, "Sentiment report")?,
        }
        writeln!(f, "Posts analyzed: {}", report.total_posts())?;
        writeln!(f, "Average compound: {:.3}", report.mean_compound())?;
        if let (Some(max), Some(min)) = (report.max_compound(), report.min_compound()) {
            writeln!(f, "Max compound: {max:.3}")?;
            writeln!(f, "Min compound: {min:.3}")?;
        }
        writeln!(
            f,
            "Positive: {}  Neutral: {}  Negative: {}",
            counts.positive, counts.neutral, counts.negative
        )?;

        for result in report.results() {
            writeln!(f)?;
            write_result(f, result)?;
        }

        Ok(())
    }
}

fn write_result(f: &mut fmt::Formatter<'_>, result: &SentimentResult) -> fmt::Result {
    let meta = result.meta();
    let when = meta
        .created_utc
        .map(format_timestamp)
        .unwrap_or_else(|| "unknown time".to_string());
    let score = meta
        .score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());

    writeln!(
        f,
        "[{}] score {} | {} ({:.3})",
        when,
        score,
        result.label(),
        result.compound()
    )?;
    writeln!(f, "  {}", result.excerpt(EXCERPT_CHARS))
}

/// Formats a post timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.to_offset(time::UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::models::PostMeta;
    use time::macros::{datetime, offset};

    fn sample_report() -> AggregateReport {
        let meta = PostMeta {
            id: Some("abc".to_string()),
            score: Some(42),
            created_utc: Some(datetime!(2024-03-01 12:30:05 UTC)),
            ..PostMeta::default()
        };
        aggregate(vec![
            SentimentResult::new("NVDA beat estimates", 0.6)
                .unwrap()
                .with_meta(meta),
            SentimentResult::new("guidance was weak", -0.2).unwrap(),
            SentimentResult::new("earnings tomorrow", 0.0).unwrap(),
        ])
    }

    #[test]
    fn text_summary_uses_three_decimals() {
        let report = sample_report();
        let text = QueryReport::new("NVDA", "stocks", &report).to_string();

        assert!(text.starts_with("Sentiment for NVDA in r/stocks\n"));
        assert!(text.contains("Posts analyzed: 3\n"));
        assert!(text.contains("Average compound: 0.133\n"));
        assert!(text.contains("Max compound: 0.600\n"));
        assert!(text.contains("Min compound: -0.200\n"));
        assert!(text.contains("Positive: 1  Neutral: 1  Negative: 1\n"));
    }

    #[test]
    fn text_entries_show_time_score_and_label() {
        let report = sample_report();
        let text = QueryReport::new("NVDA", "stocks", &report).to_string();

        assert!(text.contains("[2024-03-01 12:30:05] score 42 | positive (0.600)\n  NVDA beat estimates\n"));
        assert!(text.contains("[unknown time] score - | negative (-0.200)\n"));
    }

    #[test]
    fn text_excerpt_is_truncated() {
        let long = "a".repeat(EXCERPT_CHARS + 20);
        let report = aggregate(vec![SentimentResult::new(long, 0.0).unwrap()]);
        let text = QueryReport::new("BB", "stocks", &report).to_string();

        let expected = format!("  {}...\n", "a".repeat(EXCERPT_CHARS));
        assert!(text.ends_with(&expected));
    }

    #[test]
    fn empty_report_has_no_extremes() {
        let report = aggregate(Vec::new());
        let text = QueryReport::new("BB", "stocks", &report).to_string();

        assert!(text.contains("Posts analyzed: 0"));
        assert!(text.contains("Average compound: 0.000"));
        assert!(!text.contains("Max compound"));
    }

    #[test]
    fn standalone_report_has_generic_header() {
        let report = sample_report();
        let rendered = QueryReport::standalone(&report);

        assert!(rendered.to_string().starts_with("Sentiment report\n"));
        let value: serde_json::Value = serde_json::from_str(&rendered.to_json().unwrap()).unwrap();
        assert!(value.get("ticker").is_none());
        assert_eq!(value["total_posts"], 3);
    }

    #[test]
    fn json_includes_query_and_report() {
        let report = sample_report();
        let json = QueryReport::new("NVDA", "stocks", &report).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["ticker"], "NVDA");
        assert_eq!(value["subreddit"], "stocks");
        assert_eq!(value["total_posts"], 3);
        assert_eq!(value["counts_by_label"]["positive"], 1);
        assert_eq!(value["results"].as_array().unwrap().len(), 3);
        assert_eq!(value["results"][0]["label"], "positive");
    }

    #[test]
    fn timestamps_are_rendered_in_utc() {
        let at = datetime!(2024-03-01 14:30:00).assume_offset(offset!(+2));
        assert_eq!(format_timestamp(at), "2024-03-01 12:30:00");
    }
}
