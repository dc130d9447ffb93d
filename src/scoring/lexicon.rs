//! Word valences and the fixed heuristic word lists used by the scorer.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

/// Largest absolute valence a lexicon entry may carry.
pub const MAX_VALENCE: f64 = 4.0;

const BUILTIN_SOURCE: &str = include_str!("../../data/lexicon.tsv");

static BUILTIN: OnceLock<Result<Arc<Lexicon>, LexiconParseError>> = OnceLock::new();

/// Scalar added to (or removed from) a valence by an intensifier.
pub(crate) const BOOST_INCREMENT: f64 = 0.293;

/// Scalar for diminishers.
pub(crate) const BOOST_DECREMENT: f64 = -0.293;

/// Degree modifiers and their scalar.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOST_INCREMENT),
    ("amazingly", BOOST_INCREMENT),
    ("awfully", BOOST_INCREMENT),
    ("completely", BOOST_INCREMENT),
    ("considerably", BOOST_INCREMENT),
    ("decidedly", BOOST_INCREMENT),
    ("deeply", BOOST_INCREMENT),
    ("enormously", BOOST_INCREMENT),
    ("entirely", BOOST_INCREMENT),
    ("especially", BOOST_INCREMENT),
    ("exceptionally", BOOST_INCREMENT),
    ("extremely", BOOST_INCREMENT),
    ("fabulously", BOOST_INCREMENT),
    ("freaking", BOOST_INCREMENT),
    ("fully", BOOST_INCREMENT),
    ("greatly", BOOST_INCREMENT),
    ("hella", BOOST_INCREMENT),
    ("highly", BOOST_INCREMENT),
    ("hugely", BOOST_INCREMENT),
    ("incredibly", BOOST_INCREMENT),
    ("intensely", BOOST_INCREMENT),
    ("majorly", BOOST_INCREMENT),
    ("massively", BOOST_INCREMENT),
    ("more", BOOST_INCREMENT),
    ("most", BOOST_INCREMENT),
    ("particularly", BOOST_INCREMENT),
    ("purely", BOOST_INCREMENT),
    ("quite", BOOST_INCREMENT),
    ("really", BOOST_INCREMENT),
    ("remarkably", BOOST_INCREMENT),
    ("so", BOOST_INCREMENT),
    ("substantially", BOOST_INCREMENT),
    ("super", BOOST_INCREMENT),
    ("thoroughly", BOOST_INCREMENT),
    ("totally", BOOST_INCREMENT),
    ("tremendously", BOOST_INCREMENT),
    ("uber", BOOST_INCREMENT),
    ("unbelievably", BOOST_INCREMENT),
    ("unusually", BOOST_INCREMENT),
    ("utterly", BOOST_INCREMENT),
    ("very", BOOST_INCREMENT),
    ("almost", BOOST_DECREMENT),
    ("barely", BOOST_DECREMENT),
    ("hardly", BOOST_DECREMENT),
    ("kinda", BOOST_DECREMENT),
    ("less", BOOST_DECREMENT),
    ("little", BOOST_DECREMENT),
    ("marginally", BOOST_DECREMENT),
    ("occasionally", BOOST_DECREMENT),
    ("partly", BOOST_DECREMENT),
    ("scarcely", BOOST_DECREMENT),
    ("slightly", BOOST_DECREMENT),
    ("somewhat", BOOST_DECREMENT),
    ("sorta", BOOST_DECREMENT),
];

/// Words that flip the polarity of what follows them.
const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never", "none", "nope",
    "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];

/// Multi-word phrases whose valence replaces that of their last word.
const IDIOMS: &[(&str, f64)] = &[
    ("to the moon", 2.5),
    ("diamond hands", 2.0),
    ("buy the dip", 1.5),
    ("paper hands", -1.5),
    ("bag holder", -2.0),
    ("dead cat bounce", -1.8),
    ("kiss of death", -1.5),
    ("yeah right", -2.0),
    ("the bomb", 3.0),
    ("cut the mustard", 2.0),
    ("hand to mouth", -2.0),
];

/// Longest phrase in [`IDIOMS`], in words.
pub(crate) const MAX_IDIOM_WORDS: usize = 3;

/// A line of a lexicon file could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {reason}")]
pub struct LexiconParseError {
    pub line: usize,
    pub reason: String,
}

/// Token to valence table.
///
/// Tokens are stored lowercase and looked up lowercase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Parses tab-separated `token<TAB>valence` lines.
    ///
    /// Blank lines and lines starting with `#` are skipped. Columns after the
    /// valence are ignored, so files carrying extra rating columns load too.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse::scoring::Lexicon;
    ///
    /// let lexicon = Lexicon::parse("# comment\ngood\t1.9\nBAD\t-2.5\t0.5\n").unwrap();
    /// assert_eq!(lexicon.valence("good"), Some(1.9));
    /// assert_eq!(lexicon.valence("bad"), Some(-2.5));
    /// assert!(Lexicon::parse("good\tvery").is_err());
    /// ```
    pub fn parse(source: &str) -> Result<Self, LexiconParseError> {
        let mut valences = HashMap::new();

        for (index, raw_line) in source.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut columns = trimmed.split('\t');
            let token = columns.next().unwrap_or_default().trim().to_lowercase();
            let valence_text = columns.next().ok_or_else(|| LexiconParseError {
                line,
                reason: format!("missing valence for '{token}'"),
            })?;

            let valence: f64 = valence_text.trim().parse().map_err(|_| LexiconParseError {
                line,
                reason: format!("invalid valence '{}'", valence_text.trim()),
            })?;
            insert_entry(&mut valences, line, token, valence)?;
        }

        Ok(Self { valences })
    }

    /// The lexicon bundled with the crate.
    ///
    /// Parsed on first use and shared read-only afterwards.
    pub fn builtin() -> Result<Arc<Lexicon>, LexiconParseError> {
        BUILTIN
            .get_or_init(|| Self::parse(BUILTIN_SOURCE).map(Arc::new))
            .clone()
    }

    /// Builds a lexicon from `(token, valence)` pairs.
    ///
    /// Entries are checked like file lines; `line` in the error is the
    /// 1-based position of the offending pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulse::scoring::Lexicon;
    ///
    /// let lexicon = Lexicon::from_entries([("Moon", 1.2), ("rug", -3.0)]).unwrap();
    /// assert_eq!(lexicon.valence("moon"), Some(1.2));
    /// assert!(Lexicon::from_entries([("moon", 50.0)]).is_err());
    /// ```
    pub fn from_entries<I, S>(entries: I) -> Result<Self, LexiconParseError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut valences = HashMap::new();
        for (index, (token, valence)) in entries.into_iter().enumerate() {
            let token = token.as_ref().trim().to_lowercase();
            insert_entry(&mut valences, index + 1, token, valence)?;
        }
        Ok(Self { valences })
    }

    /// Valence of a lowercase token.
    pub fn valence(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

/// Checks one entry and adds it to `valences`.
fn insert_entry(
    valences: &mut HashMap<String, f64>,
    line: usize,
    token: String,
    valence: f64,
) -> Result<(), LexiconParseError> {
    if !valence.is_finite() || valence.abs() > MAX_VALENCE {
        return Err(LexiconParseError {
            line,
            reason: format!("valence {valence} is outside [-{MAX_VALENCE}, {MAX_VALENCE}]"),
        });
    }
    if token.is_empty() {
        return Err(LexiconParseError {
            line,
            reason: "empty token".to_string(),
        });
    }
    if valences.contains_key(&token) {
        return Err(LexiconParseError {
            line,
            reason: format!("duplicate token '{token}'"),
        });
    }
    valences.insert(token, valence);
    Ok(())
}

/// Scalar of a degree modifier.
pub(crate) fn booster(token: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, scalar)| *scalar)
}

/// Whether a lowercase token negates what follows it.
pub(crate) fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.contains("n't")
}

/// Valence of a lowercase multi-word phrase.
pub(crate) fn idiom(phrase: &str) -> Option<f64> {
    IDIOMS
        .iter()
        .find(|(words, _)| *words == phrase)
        .map(|(_, valence)| *valence)
}
