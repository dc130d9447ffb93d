use pulse::aggregator::{aggregate, score_post};
use pulse::models::{LabelCounts, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, RawPost, SentimentLabel, SentimentResult};
use pulse::normalizer::TextNormalizer;
use pulse::pipeline::SentimentPipeline;
use pulse::scoring::{LexiconScorer, PolarityScorer, ScoringError};

/// Posts resembling what a busy ticker thread returns.
fn sample_posts() -> Vec<RawPost> {
    vec![
        RawPost::new("TSLA to the moon 🚀🚀🚀", "Deliveries were great, very bullish!!"),
        RawPost::new("Is TSLA overvalued?", "Not sure about the current price"),
        RawPost::new(
            "TSLA earnings were a disaster",
            "Worst quarter in years, stock is tanking. https://example.com/chart",
        ),
        RawPost::new("u/someone posted this on r/stocks", ""),
        RawPost::new("TSLA", "It's not bad, but not great either"),
        RawPost::new("🚀🚀🚀", ""),
    ]
}

#[test]
fn normalize_is_deterministic() {
    for post in sample_posts() {
        assert_eq!(TextNormalizer::normalize(&post), TextNormalizer::normalize(&post));
    }
}

#[test]
fn normalized_text_has_no_urls() {
    let post = RawPost::new("Check this https://example.com/x now", "");
    let text = TextNormalizer::normalize(&post);

    assert!(!text.as_str().contains("http"));
    assert_eq!(text.as_str(), "Check this now");
}

#[test]
fn normalized_text_has_no_runs_of_whitespace() {
    for post in sample_posts() {
        let text = TextNormalizer::normalize(&post);
        assert!(!text.as_str().contains("  "), "{text:?}");
        assert_eq!(text.as_str(), text.as_str().trim());
    }
}

#[test]
fn compound_scores_stay_in_range() -> Result<(), ScoringError> {
    let scorer = LexiconScorer::builtin()?;

    for post in sample_posts() {
        let result = score_post(&scorer, &TextNormalizer::normalize(&post))?;
        assert!((-1.0..=1.0).contains(&result.compound()));
    }

    let extreme = "GREAT GREAT GREAT amazing awesome excellent best love!!!!!!";
    assert!(scorer.score(extreme)? <= 1.0);

    Ok(())
}

#[test]
fn labels_agree_with_thresholds() -> Result<(), ScoringError> {
    let scorer = LexiconScorer::builtin()?;

    for post in sample_posts() {
        let result = score_post(&scorer, &TextNormalizer::normalize(&post))?;
        let expected = if result.compound() >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if result.compound() <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        assert_eq!(result.label(), expected);
    }

    Ok(())
}

#[test]
fn clearly_polarized_posts_are_classified() {
    let pipeline = SentimentPipeline::builtin().unwrap();

    let positive = pipeline
        .score(&RawPost::new("Great quarter", "really strong results"))
        .unwrap();
    assert_eq!(positive.label(), SentimentLabel::Positive);

    let negative = pipeline
        .score(&RawPost::new("Terrible quarter", "worst results, a disaster"))
        .unwrap();
    assert_eq!(negative.label(), SentimentLabel::Negative);
}

#[test]
fn report_counts_are_consistent() {
    let pipeline = SentimentPipeline::builtin().unwrap();
    let posts = sample_posts();
    let report = pipeline.analyze(&posts).unwrap();

    assert_eq!(report.total_posts(), posts.len());
    assert_eq!(report.results().len(), posts.len());
    assert_eq!(report.counts_by_label().total(), posts.len());
}

#[test]
fn report_preserves_post_order() {
    let pipeline = SentimentPipeline::builtin().unwrap();
    let posts = sample_posts();
    let report = pipeline.analyze(&posts).unwrap();

    for (post, result) in posts.iter().zip(report.results()) {
        assert_eq!(TextNormalizer::normalize(post).as_str(), result.source_text());
    }
}

#[test]
fn empty_input_yields_empty_report() {
    let report = aggregate(Vec::new());

    assert_eq!(report.total_posts(), 0);
    assert_eq!(*report.counts_by_label(), LabelCounts::default());
    assert_eq!(report.mean_compound(), 0.0);
    assert!(report.results().is_empty());
}

#[test]
fn mean_of_known_scores() {
    let results = [0.6, -0.2, 0.0]
        .into_iter()
        .map(|compound| SentimentResult::new("post", compound).unwrap())
        .collect();
    let report = aggregate(results);

    assert!((report.mean_compound() - 0.1333).abs() < 1e-4);
}

#[test]
fn fully_stripped_post_counts_as_neutral() {
    let pipeline = SentimentPipeline::builtin().unwrap();
    let report = pipeline.analyze(&[RawPost::new("🚀🚀🚀", "")]).unwrap();

    assert_eq!(report.total_posts(), 1);
    assert_eq!(report.counts_by_label().neutral, 1);
}
