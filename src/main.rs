use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pulse::catalog::{STOCKS, SUBREDDITS};
use pulse::models::{RawPost, SentimentLabel, SentimentResult};
use pulse::normalizer::TextNormalizer;
use pulse::pipeline::SentimentPipeline;
use pulse::reddit::{
    DEFAULT_LIMIT, PostFetcher, RedditApi, RedditClientBuilder, RedditError, is_valid_subreddit,
};
use pulse::render::QueryReport;
use pulse::scoring::{LexiconScorer, PolarityScores};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// pulse - sentiment of Reddit chatter about a stock
#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Scores the sentiment of Reddit posts about a stock")]
#[command(version)]
struct Cli {
    /// Tab-separated lexicon file to use instead of the bundled one
    #[arg(long, global = true, value_name = "PATH")]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Fetch posts about a ticker from a subreddit and score them
    Analyze(AnalyzeCommand),
    /// Score posts from a JSON file
    File(FileCommand),
    /// Score a single piece of text
    Score(ScoreCommand),
    /// List the suggested tickers
    Stocks,
    /// List the suggested subreddits
    Subreddits,
}

/// Analyze a ticker in a subreddit
#[derive(Parser)]
struct AnalyzeCommand {
    /// Ticker or company name to search for
    #[arg(value_name = "TICKER")]
    ticker: String,

    /// Subreddit to search, without the r/ prefix
    #[arg(value_name = "SUBREDDIT")]
    subreddit: String,

    /// Posts to collect per sort order (top, then new)
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Analyze posts stored in a file
#[derive(Parser)]
struct FileCommand {
    /// JSON array of objects with `title` and optional `body`
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Score one text
#[derive(Parser)]
struct ScoreCommand {
    #[arg(value_name = "TEXT")]
    text: String,
}

fn main() {
    // A missing .env file is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Analyze(cmd) => handle_analyze(cmd, cli.lexicon.as_deref()),
        Commands::File(cmd) => handle_file(cmd, cli.lexicon.as_deref()),
        Commands::Score(cmd) => handle_score(cmd, cli.lexicon.as_deref()),
        Commands::Stocks => {
            print_list(STOCKS);
            Ok(())
        }
        Commands::Subreddits => {
            print_list(SUBREDDITS);
            Ok(())
        }
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors include empty arguments, queries with no posts and missing or
/// rejected Reddit credentials. Network failures, bad files and lexicon
/// problems are internal errors.
fn is_user_error(error: &anyhow::Error) -> bool {
    if let Some(reddit) = error.downcast_ref::<RedditError>() {
        return reddit.is_configuration();
    }

    let error_msg = error.to_string();
    error_msg.contains("cannot be empty") || error_msg.contains("No posts found")
}

/// Builds the pipeline over the bundled lexicon or the one at `lexicon`.
fn build_pipeline(lexicon: Option<&Path>) -> Result<SentimentPipeline> {
    let scorer = match lexicon {
        Some(path) => LexiconScorer::from_path(path)?,
        None => LexiconScorer::builtin()?,
    };
    Ok(SentimentPipeline::new(scorer))
}

/// Handles the analyze command by fetching posts from Reddit.
fn handle_analyze(cmd: &AnalyzeCommand, lexicon: Option<&Path>) -> Result<()> {
    let (ticker, subreddit) = validate_query(&cmd.ticker, &cmd.subreddit)?;

    let pipeline = build_pipeline(lexicon)?;
    let client = RedditClientBuilder::new().build()?;
    let fetcher = PostFetcher::new(client).limit(cmd.limit);

    execute_analyze(ticker, subreddit, &fetcher, &pipeline, cmd.json)
}

/// Trims both query parts and rejects blank ones.
fn validate_query<'a>(ticker: &'a str, subreddit: &'a str) -> Result<(&'a str, &'a str)> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        anyhow::bail!("Ticker cannot be empty");
    }

    let subreddit = subreddit.trim().trim_start_matches("r/");
    if subreddit.is_empty() {
        anyhow::bail!("Subreddit cannot be empty");
    }
    if !is_valid_subreddit(subreddit) {
        return Err(RedditError::InvalidSubreddit(subreddit.to_string()).into());
    }

    Ok((ticker, subreddit))
}

/// Executes the analyze command logic with a provided fetcher.
///
/// This function is separated from `handle_analyze` to allow testing with
/// stubbed Reddit responses.
fn execute_analyze<A: RedditApi>(
    ticker: &str,
    subreddit: &str,
    fetcher: &PostFetcher<A>,
    pipeline: &SentimentPipeline,
    json: bool,
) -> Result<()> {
    let posts = fetcher.fetch_posts(ticker, subreddit)?;
    if posts.is_empty() {
        anyhow::bail!("No posts found for {} in r/{}", ticker, subreddit);
    }

    let report = pipeline
        .analyze(&posts)
        .context("Failed to analyze posts")?;
    info!(
        ticker,
        subreddit,
        mean = report.mean_compound(),
        "analysis complete"
    );

    print_report(&QueryReport::new(ticker, subreddit, &report), json)
}

/// Handles the file command by scoring posts read from disk.
fn handle_file(cmd: &FileCommand, lexicon: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(&cmd.path)
        .with_context(|| format!("Failed to read post file: {}", cmd.path.display()))?;
    let posts = RawPost::parse_list(&content)
        .with_context(|| format!("Failed to parse post file: {}", cmd.path.display()))?;

    let pipeline = build_pipeline(lexicon)?;
    let report = pipeline
        .analyze(&posts)
        .context("Failed to analyze posts")?;

    print_report(&QueryReport::standalone(&report), cmd.json)
}

/// Handles the score command for a single text.
fn handle_score(cmd: &ScoreCommand, lexicon: Option<&Path>) -> Result<()> {
    if cmd.text.trim().is_empty() {
        anyhow::bail!("Text cannot be empty");
    }

    let pipeline = build_pipeline(lexicon)?;
    let (result, scores) = score_text(&cmd.text, pipeline.scorer())?;

    println!("Cleaned text: {}", result.source_text());
    println!("Label: {}", result.label());
    println!("Compound: {:.4}", result.compound());
    println!(
        "Positive: {:.3}  Neutral: {:.3}  Negative: {:.3}",
        scores.positive, scores.neutral, scores.negative
    );
    if result.label() == SentimentLabel::Neutral && result.source_text().is_empty() {
        println!("(nothing left to score after cleaning)");
    }

    Ok(())
}

/// Cleans and scores `text` once, returning the result with its proportions.
fn score_text(text: &str, scorer: &LexiconScorer) -> Result<(SentimentResult, PolarityScores)> {
    let cleaned = TextNormalizer::normalize_text(text);
    let scores = scorer.polarity_scores(cleaned.as_str());
    let result = SentimentResult::new(cleaned.as_str(), scores.compound)
        .context("Failed to score text")?;
    Ok((result, scores))
}

fn print_report(report: &QueryReport<'_>, json: bool) -> Result<()> {
    if json {
        let rendered = report.to_json().context("Failed to serialize report")?;
        println!("{rendered}");
    } else {
        print!("{report}");
    }
    Ok(())
}

fn print_list(items: &[&str]) {
    for item in items {
        println!("{item}");
    }
}
