//! Rule-based polarity engine over a [`Lexicon`].

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::lexicon::{self, Lexicon, MAX_IDIOM_WORDS};
use crate::models::InvalidResultError;
use super::{PolarityScorer, ScoringError};

/// Extra valence for an all-caps word in mixed-case text.
const CAPS_INCREMENT: f64 = 0.733;

/// Factor applied to a valence under negation.
const NEGATION_SCALAR: f64 = -0.74;

/// Smoothing constant of the compound normalization.
const NORMALIZATION_ALPHA: f64 = 15.0;

const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_BOOST: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;

/// Proportions of positive, neutral and negative signal plus the compound
/// score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PolarityScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

/// Lexicon and heuristics polarity scorer.
///
/// Word valences come from the lexicon; negations, degree modifiers, a
/// contrastive "but", all-caps emphasis and `!`/`?` runs adjust them. The
/// summed valence is squashed into [-1.0, 1.0] with `x / sqrt(x² + 15)`.
///
/// The scorer holds nothing but a shared read-only lexicon, so clones are
/// cheap and it can be used from several threads at once.
///
/// # Examples
///
/// ```
/// use pulse::scoring::LexiconScorer;
///
/// let scorer = LexiconScorer::builtin()?;
/// assert!(scorer.polarity_scores("NVDA earnings were great").compound > 0.5);
/// assert!(scorer.polarity_scores("NVDA earnings were not great").compound < 0.0);
/// # Ok::<(), pulse::scoring::ScoringError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Arc<Lexicon>,
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon: Arc::new(lexicon),
        }
    }

    /// Scorer over the bundled lexicon.
    pub fn builtin() -> Result<Self, ScoringError> {
        Ok(Self {
            lexicon: Lexicon::builtin()?,
        })
    }

    /// Scorer over a lexicon file (see [`Lexicon::parse`] for the format).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScoringError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|source| ScoringError::LexiconUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(Lexicon::parse(&source)?))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Scores `text`. Empty or lexicon-free text yields all zeros except
    /// for the neutral share.
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let words = split_words(text);
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let sentence = Sentence {
            words: &words,
            lower: &lower,
            caps_differ: caps_differ(&words),
            lexicon: &self.lexicon,
        };

        let mut sentiments: Vec<f64> = (0..words.len())
            .map(|i| sentence.valence_at(i))
            .collect();
        apply_but_shift(&lower, &mut sentiments);

        score_valence(&sentiments, text)
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64, ScoringError> {
        checked_compound(self.polarity_scores(text).compound)
    }
}

/// Rejects a compound that is not a finite value in [-1.0, 1.0].
fn checked_compound(compound: f64) -> Result<f64, ScoringError> {
    if !compound.is_finite() {
        return Err(InvalidResultError::NotFinite.into());
    }
    if !(-1.0..=1.0).contains(&compound) {
        return Err(InvalidResultError::OutOfRange(compound).into());
    }
    Ok(compound)
}

/// Whitespace tokens with surrounding punctuation stripped, unless that
/// would leave two characters or fewer.
fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                token
            } else {
                stripped
            }
        })
        .collect()
}

fn is_shouting(word: &str) -> bool {
    let mut letters = word.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

/// True when some, but not all, words are in capitals.
fn caps_differ(words: &[&str]) -> bool {
    let shouting = words.iter().filter(|w| is_shouting(w)).count();
    shouting > 0 && shouting < words.len()
}

struct Sentence<'a> {
    words: &'a [&'a str],
    lower: &'a [String],
    caps_differ: bool,
    lexicon: &'a Lexicon,
}

impl Sentence<'_> {
    fn valence_at(&self, i: usize) -> f64 {
        let word = self.lower[i].as_str();
        if lexicon::booster(word).is_some() {
            return 0.0;
        }
        if word == "kind" && self.lower.get(i + 1).is_some_and(|next| next == "of") {
            return 0.0;
        }

        let valence = match self.lexicon.valence(word) {
            Some(base) => self.adjusted_valence(i, base),
            None => 0.0,
        };
        self.idiom_valence(i).unwrap_or(valence)
    }

    fn adjusted_valence(&self, i: usize, base: f64) -> f64 {
        let lower = self.lower;
        let mut valence = base;

        // "no" directly before another sentiment word acts as a negation,
        // not as a sentiment word of its own.
        if lower[i] == "no" && lower.get(i + 1).is_some_and(|next| self.lexicon.contains(next)) {
            valence = 0.0;
        }
        let after_no = (i > 0 && lower[i - 1] == "no")
            || (i > 1 && lower[i - 2] == "no")
            || (i > 2 && lower[i - 3] == "no" && matches!(lower[i - 1].as_str(), "or" | "nor"));
        if after_no {
            valence = base * NEGATION_SCALAR;
        }

        if self.caps_differ && is_shouting(self.words[i]) {
            valence += if valence > 0.0 {
                CAPS_INCREMENT
            } else {
                -CAPS_INCREMENT
            };
        }

        for distance in 0..3 {
            if i <= distance {
                break;
            }
            let j = i - (distance + 1);
            if self.lexicon.contains(&lower[j]) {
                continue;
            }
            let dampening = match distance {
                0 => 1.0,
                1 => 0.95,
                _ => 0.9,
            };
            valence += self.booster_scalar(j, valence) * dampening;
            valence = self.negate(valence, distance, i);
        }

        self.least_check(valence, i)
    }

    /// Degree-modifier contribution of word `j` on a word with `valence`.
    fn booster_scalar(&self, j: usize, valence: f64) -> f64 {
        let Some(mut scalar) = lexicon::booster(&self.lower[j]) else {
            return 0.0;
        };
        if valence < 0.0 {
            scalar = -scalar;
        }
        if self.caps_differ && is_shouting(self.words[j]) {
            scalar += if valence > 0.0 {
                CAPS_INCREMENT
            } else {
                -CAPS_INCREMENT
            };
        }
        scalar
    }

    fn negate(&self, valence: f64, distance: usize, i: usize) -> f64 {
        let lower = self.lower;
        let emphasis = |w: &str| w == "so" || w == "this";

        match distance {
            0 => {
                if lexicon::is_negation(&lower[i - 1]) {
                    return valence * NEGATION_SCALAR;
                }
            }
            1 => {
                if lower[i - 2] == "never" && emphasis(lower[i - 1].as_str()) {
                    return valence * 1.25;
                }
                if lower[i - 2] == "without" && lower[i - 1] == "doubt" {
                    return valence;
                }
                if lexicon::is_negation(&lower[i - 2]) {
                    return valence * NEGATION_SCALAR;
                }
            }
            _ => {
                if lower[i - 3] == "never"
                    && (emphasis(lower[i - 2].as_str()) || emphasis(lower[i - 1].as_str()))
                {
                    return valence * 1.25;
                }
                if lower[i - 3] == "without" && (lower[i - 2] == "doubt" || lower[i - 1] == "doubt")
                {
                    return valence;
                }
                if lexicon::is_negation(&lower[i - 3]) {
                    return valence * NEGATION_SCALAR;
                }
            }
        }
        valence
    }

    /// "least good" flips, "at least good" and "very least good" do not.
    fn least_check(&self, valence: f64, i: usize) -> f64 {
        let lower = self.lower;
        if i == 0 || lower[i - 1] != "least" || self.lexicon.contains("least") {
            return valence;
        }
        let guarded = i > 1 && matches!(lower[i - 2].as_str(), "at" | "very");
        if guarded {
            valence
        } else {
            valence * NEGATION_SCALAR
        }
    }

    /// Valence of the longest known phrase ending at word `i`.
    fn idiom_valence(&self, i: usize) -> Option<f64> {
        (2..=MAX_IDIOM_WORDS).rev().find_map(|len| {
            if i + 1 < len {
                return None;
            }
            let phrase = self.lower[i + 1 - len..=i].join(" ");
            lexicon::idiom(&phrase)
        })
    }
}

/// Words before "but" count half, words after it count one and a half.
fn apply_but_shift(lower: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (index, sentiment) in sentiments.iter_mut().enumerate() {
        if index < pivot {
            *sentiment *= 0.5;
        } else if index > pivot {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();

    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * QUESTION_BOOST,
        _ => MAX_QUESTION_EMPHASIS,
    };
    exclamations as f64 * EXCLAMATION_BOOST + question_emphasis
}

/// Squashes an unbounded valence sum into [-1.0, 1.0].
fn normalize_score(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores::default();
    }

    let emphasis = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize_score(sum);

    let mut positive_sum = 0.0;
    let mut negative_sum = 0.0;
    let mut neutral_count = 0.0;
    for &sentiment in sentiments {
        if sentiment > 0.0 {
            positive_sum += sentiment + 1.0;
        } else if sentiment < 0.0 {
            negative_sum += sentiment - 1.0;
        } else {
            neutral_count += 1.0;
        }
    }
    if positive_sum > f64::abs(negative_sum) {
        positive_sum += emphasis;
    } else if positive_sum < f64::abs(negative_sum) {
        negative_sum -= emphasis;
    }

    let total = positive_sum + f64::abs(negative_sum) + neutral_count;
    PolarityScores {
        negative: round_to(f64::abs(negative_sum / total), 3),
        neutral: round_to(f64::abs(neutral_count / total), 3),
        positive: round_to(f64::abs(positive_sum / total), 3),
        compound: round_to(compound, 4),
    }
}
