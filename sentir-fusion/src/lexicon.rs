//! Sentiment Lexicon
//!
//! Small built-in word lexicon with two estimators on top of it:
//! - `estimate`: averaged polarity in `[-1,1]` and subjectivity in `[0,1]`,
//!   used by the lexical scorer's polarity bias
//! - `polarity_scores`: positive / negative / neutral proportions plus a
//!   compound score, used by the in-process `lexicon` sentiment provider
//!
//! Both share one tokenizer and the same negation / amplifier markers.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Tokens that flip the meaning of what follows
pub const NEGATIONS: [&str; 6] = ["not", "never", "no", "don't", "can't", "won't"];

/// Tokens that strengthen what follows
pub const AMPLIFIERS: [&str; 5] = ["very", "extremely", "really", "so", "quite"];

/// How far back a negation reaches
const NEGATION_WINDOW: usize = 3;

const NEGATION_POLARITY_FACTOR: f64 = -0.5;
const AMPLIFIER_FACTOR: f64 = 1.3;

const VALENCE_SCALE: f64 = 4.0;
const VALENCE_NEGATION_FACTOR: f64 = -0.74;
const VALENCE_BOOST: f64 = 0.293;
const COMPOUND_ALPHA: f64 = 15.0;

/// word -> (polarity, subjectivity)
static LEXICON: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    [
        // positive
        ("good", (0.7, 0.6)),
        ("great", (0.8, 0.75)),
        ("excellent", (1.0, 1.0)),
        ("amazing", (0.6, 0.9)),
        ("wonderful", (1.0, 1.0)),
        ("fantastic", (0.4, 0.9)),
        ("awesome", (1.0, 1.0)),
        ("best", (1.0, 0.3)),
        ("better", (0.5, 0.5)),
        ("nice", (0.6, 1.0)),
        ("beautiful", (0.85, 1.0)),
        ("lovely", (0.5, 0.75)),
        ("love", (0.5, 0.6)),
        ("loved", (0.7, 0.8)),
        ("like", (0.2, 0.3)),
        ("happy", (0.8, 1.0)),
        ("glad", (0.5, 1.0)),
        ("joyful", (0.8, 0.9)),
        ("cheerful", (0.75, 0.85)),
        ("delighted", (0.7, 0.9)),
        ("pleased", (0.5, 1.0)),
        ("satisfied", (0.5, 1.0)),
        ("grateful", (0.6, 0.8)),
        ("thankful", (0.6, 0.8)),
        ("proud", (0.8, 1.0)),
        ("hopeful", (0.5, 0.7)),
        ("optimistic", (0.5, 0.7)),
        ("relieved", (0.4, 0.6)),
        ("calm", (0.3, 0.75)),
        ("peaceful", (0.25, 0.5)),
        ("fun", (0.3, 0.2)),
        ("perfect", (1.0, 1.0)),
        ("brilliant", (0.9, 1.0)),
        ("impressed", (0.6, 0.8)),
        ("enjoy", (0.4, 0.5)),
        ("enjoyed", (0.5, 0.6)),
        ("successful", (0.75, 0.95)),
        ("confident", (0.5, 0.7)),
        ("kind", (0.6, 0.9)),
        ("fine", (0.4, 0.5)),
        // negative
        ("bad", (-0.7, 0.67)),
        ("worse", (-0.4, 0.6)),
        ("worst", (-1.0, 1.0)),
        ("terrible", (-1.0, 1.0)),
        ("awful", (-1.0, 1.0)),
        ("horrible", (-1.0, 1.0)),
        ("poor", (-0.4, 0.6)),
        ("sad", (-0.5, 1.0)),
        ("unhappy", (-0.6, 0.9)),
        ("depressed", (-0.7, 0.9)),
        ("angry", (-0.5, 1.0)),
        ("furious", (-0.8, 1.0)),
        ("mad", (-0.6, 1.0)),
        ("hate", (-0.8, 0.9)),
        ("disgusting", (-1.0, 1.0)),
        ("annoying", (-0.8, 0.9)),
        ("annoyed", (-0.6, 0.8)),
        ("boring", (-1.0, 1.0)),
        ("bored", (-0.5, 0.8)),
        ("disappointed", (-0.75, 0.75)),
        ("disappointing", (-0.6, 0.7)),
        ("frustrated", (-0.7, 0.8)),
        ("afraid", (-0.6, 0.9)),
        ("scared", (-0.5, 0.8)),
        ("terrified", (-0.9, 1.0)),
        ("worried", (-0.5, 0.8)),
        ("anxious", (-0.4, 0.8)),
        ("nervous", (-0.3, 0.7)),
        ("ashamed", (-0.6, 0.9)),
        ("embarrassed", (-0.5, 0.9)),
        ("guilty", (-0.5, 0.7)),
        ("lonely", (-0.5, 0.9)),
        ("hurt", (-0.5, 0.7)),
        ("painful", (-0.7, 0.9)),
        ("ugly", (-0.7, 1.0)),
        ("stupid", (-0.8, 1.0)),
        ("wrong", (-0.5, 0.9)),
        ("fail", (-0.5, 0.3)),
        ("failed", (-0.5, 0.3)),
        ("problem", (-0.2, 0.3)),
        ("bitter", (-0.6, 0.8)),
        ("miserable", (-1.0, 1.0)),
    ]
    .into_iter()
    .collect()
});

/// Averaged polarity and subjectivity of a text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextSentiment {
    /// -1.0 (negative) ..= 1.0 (positive)
    pub polarity: f64,
    /// 0.0 (objective) ..= 1.0 (subjective)
    pub subjectivity: f64,
}

/// Valence proportions of a text; `positive + negative + neutral == 1` for non-empty text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarityScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    /// Normalized valence sum in `[-1,1]`
    pub compound: f64,
}

/// Lower-cased word tokens; apostrophes and hyphens stay inside words
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|token| token.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token)
}

pub fn is_amplifier(token: &str) -> bool {
    AMPLIFIERS.contains(&token)
}

fn negated(tokens: &[String], index: usize) -> bool {
    let start = index.saturating_sub(NEGATION_WINDOW);
    tokens[start..index].iter().any(|t| is_negation(t))
}

fn amplified(tokens: &[String], index: usize) -> bool {
    index > 0 && is_amplifier(&tokens[index - 1])
}

/// Mean polarity and subjectivity over the lexicon words found in `text`
///
/// A negation within the three preceding tokens flips and halves a word's
/// polarity; an amplifier directly before it scales it by 1.3.
pub fn estimate(text: &str) -> TextSentiment {
    let tokens = tokenize(text);

    let mut polarity_sum = 0.0;
    let mut subjectivity_sum = 0.0;
    let mut hits = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let Some(&(polarity, subjectivity)) = LEXICON.get(token.as_str()) else {
            continue;
        };

        let mut polarity = polarity;
        let mut subjectivity = subjectivity;
        if amplified(&tokens, i) {
            polarity *= AMPLIFIER_FACTOR;
            subjectivity *= AMPLIFIER_FACTOR;
        }
        if negated(&tokens, i) {
            polarity *= NEGATION_POLARITY_FACTOR;
        }

        polarity_sum += polarity.clamp(-1.0, 1.0);
        subjectivity_sum += subjectivity.clamp(0.0, 1.0);
        hits += 1;
    }

    if hits == 0 {
        return TextSentiment {
            polarity: 0.0,
            subjectivity: 0.0,
        };
    }

    TextSentiment {
        polarity: (polarity_sum / hits as f64).clamp(-1.0, 1.0),
        subjectivity: (subjectivity_sum / hits as f64).clamp(0.0, 1.0),
    }
}

/// Valence proportions over every token of `text`
///
/// Tokens outside the lexicon count as neutral. Empty text is fully neutral.
pub fn polarity_scores(text: &str) -> PolarityScores {
    let tokens = tokenize(text);

    let mut positive_sum = 0.0;
    let mut negative_sum = 0.0;
    let mut neutral_count = 0.0;
    let mut valence_sum = 0.0;

    for (i, token) in tokens.iter().enumerate() {
        let valence = match LEXICON.get(token.as_str()) {
            Some(&(polarity, _)) => {
                let mut valence = polarity * VALENCE_SCALE;
                if amplified(&tokens, i) {
                    valence += VALENCE_BOOST * valence.signum();
                }
                if negated(&tokens, i) {
                    valence *= VALENCE_NEGATION_FACTOR;
                }
                valence
            }
            None => 0.0,
        };

        valence_sum += valence;
        if valence > 0.0 {
            positive_sum += valence + 1.0;
        } else if valence < 0.0 {
            negative_sum += valence - 1.0;
        } else {
            neutral_count += 1.0;
        }
    }

    let total = positive_sum + negative_sum.abs() + neutral_count;
    if total <= 0.0 {
        return PolarityScores {
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            compound: 0.0,
        };
    }

    PolarityScores {
        positive: positive_sum / total,
        negative: negative_sum.abs() / total,
        neutral: neutral_count / total,
        compound: valence_sum / (valence_sum * valence_sum + COMPOUND_ALPHA).sqrt(),
    }
}
