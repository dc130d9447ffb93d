//! Tickers and communities offered for selection, and search-term expansion.

/// Tickers offered for selection.
pub const STOCKS: &[&str] = &[
    "TSLA", "AAPL", "GME", "AMC", "NVDA", "MSFT", "GOOGL", "AMZN", "META", "NFLX", "AMD", "PLTR",
    "BB", "NOK", "NIO", "COIN",
];

/// Subreddits offered for selection.
pub const SUBREDDITS: &[&str] = &[
    "wallstreetbets",
    "stocks",
    "investing",
    "StockMarket",
    "options",
    "pennystocks",
    "Daytrading",
    "SecurityAnalysis",
];

/// Ticker to company name. Lookups by name return the first matching ticker.
const COMPANY_NAMES: &[(&str, &str)] = &[
    ("TSLA", "Tesla"),
    ("AAPL", "Apple"),
    ("GME", "GameStop"),
    ("AMC", "AMC"),
    ("NVDA", "Nvidia"),
    ("MSFT", "Microsoft"),
    ("GOOGL", "Google"),
    ("GOOG", "Google"),
    ("AMZN", "Amazon"),
    ("META", "Meta"),
    ("NFLX", "Netflix"),
    ("AMD", "AMD"),
    ("PLTR", "Palantir"),
    ("BB", "BlackBerry"),
    ("NOK", "Nokia"),
    ("SPCE", "Virgin Galactic"),
    ("NIO", "NIO"),
    ("COIN", "Coinbase"),
];

/// Company name for a ticker (case-insensitive).
pub fn company_name(ticker: &str) -> Option<&'static str> {
    COMPANY_NAMES
        .iter()
        .find(|(symbol, _)| symbol.eq_ignore_ascii_case(ticker))
        .map(|(_, name)| *name)
}

/// Ticker for a company name (case-insensitive).
pub fn ticker_for(name: &str) -> Option<&'static str> {
    COMPANY_NAMES
        .iter()
        .find(|(_, company)| company.eq_ignore_ascii_case(name))
        .map(|(symbol, _)| *symbol)
}

/// Search terms for a stock query: the query itself, then its company name
/// or ticker counterpart when known.
///
/// Terms equal ignoring case are listed once.
///
/// # Examples
///
/// ```
/// use pulse::catalog::search_terms;
///
/// assert_eq!(search_terms("TSLA"), vec!["TSLA", "Tesla"]);
/// assert_eq!(search_terms("nvidia"), vec!["nvidia", "NVDA"]);
/// assert_eq!(search_terms("AMC"), vec!["AMC"]);
/// assert_eq!(search_terms("XYZ"), vec!["XYZ"]);
/// ```
pub fn search_terms(query: &str) -> Vec<String> {
    let query = query.trim();
    let mut terms = vec![query.to_string()];

    let counterpart = company_name(query).or_else(|| ticker_for(query));
    if let Some(term) = counterpart
        && !term.eq_ignore_ascii_case(query)
    {
        terms.push(term.to_string());
    }

    terms
}
