//! Lexical Pattern Scorer
//!
//! Keyword and phrase based emotion scoring with sentence-level context.
//! Always produces a full `EmotionVector` and never fails, which makes it the
//! fallback emotion source of every analysis.
//!
//! # Algorithm
//! 1. Split text into sentences on `.`, `!` and `?`
//! 2. Weight each sentence by `word_count / 10`
//! 3. Count keyword matches per emotion: 0.3 in a negated sentence, 1.5 in an
//!    amplified one, otherwise 1.0. A keyword matches a whole token, bare or
//!    with a regular inflection (`love` matches `loved` and `loving`, `mad`
//!    never matches `made`)
//! 4. Scale by sentence weight and the emotion's intensity multiplier
//! 5. Divide by the accumulated sentence weight
//! 6. Bias by overall text polarity and subjectivity (see `lexicon::estimate`)

use crate::lexicon::{self, TextSentiment};
use crate::taxonomy::{Emotion, HIGHLY_SUBJECTIVE, NEGATIVE_LEANING, POSITIVE_LEANING};
use crate::types::{CategoricalScores, EmotionVector};

const NEGATED_MATCH: f64 = 0.3;
const AMPLIFIED_MATCH: f64 = 1.5;
const PLAIN_MATCH: f64 = 1.0;

/// Endings a keyword may carry and still match
const INFLECTIONS: [&str; 8] = ["s", "es", "d", "ed", "ing", "ly", "er", "est"];

/// Endings allowed after a keyword's dropped final `e` (`admire` -> `admiring`)
const E_DROP_INFLECTIONS: [&str; 4] = ["ing", "ed", "er", "est"];

/// Polarity magnitude beyond which a leaning subset is boosted
const POLARITY_THRESHOLD: f64 = 0.1;
const SUBJECTIVITY_THRESHOLD: f64 = 0.5;

/// Pre-tokenized keyword table, built once and shared read-only
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    keywords: Vec<(Emotion, Vec<Vec<String>>)>,
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Running totals folded across sentences
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    scores: EmotionVector,
    total_weight: f64,
}

impl Accumulator {
    fn finish(self) -> EmotionVector {
        if self.total_weight <= 0.0 {
            return self.scores;
        }
        let values: Vec<f64> = self
            .scores
            .values()
            .iter()
            .map(|v| v / self.total_weight)
            .collect();
        EmotionVector::from_values(&values)
    }
}

/// Context of one sentence
#[derive(Debug, Clone, Copy, PartialEq)]
enum SentenceContext {
    Negated,
    Amplified,
    Plain,
}

impl SentenceContext {
    fn of(tokens: &[String]) -> Self {
        if tokens.iter().any(|t| lexicon::is_negation(t)) {
            SentenceContext::Negated
        } else if tokens.iter().any(|t| lexicon::is_amplifier(t)) {
            SentenceContext::Amplified
        } else {
            SentenceContext::Plain
        }
    }

    fn match_value(self) -> f64 {
        match self {
            SentenceContext::Negated => NEGATED_MATCH,
            SentenceContext::Amplified => AMPLIFIED_MATCH,
            SentenceContext::Plain => PLAIN_MATCH,
        }
    }
}

impl LexicalScorer {
    pub fn new() -> Self {
        let keywords = Emotion::ALL
            .iter()
            .map(|emotion| {
                let phrases = emotion
                    .keywords()
                    .iter()
                    .map(|phrase| lexicon::tokenize(phrase))
                    .filter(|tokens| !tokens.is_empty())
                    .collect();
                (*emotion, phrases)
            })
            .collect();

        Self { keywords }
    }

    /// Score `text` against the keyword table
    pub fn score(&self, text: &str) -> EmotionVector {
        let scores = sentences(text)
            .fold(Accumulator::default(), |acc, sentence| self.absorb(acc, sentence))
            .finish();

        apply_polarity_bias(scores, lexicon::estimate(text))
    }

    fn absorb(&self, mut acc: Accumulator, sentence: &str) -> Accumulator {
        let weight = sentence.split_whitespace().count() as f64 / 10.0;
        let tokens = lexicon::tokenize(sentence);
        let match_value = SentenceContext::of(&tokens).match_value();

        for (emotion, phrases) in &self.keywords {
            let matched = phrases
                .iter()
                .filter(|phrase| contains_phrase(&tokens, phrase))
                .count();

            if matched > 0 {
                let multiplier = emotion.metadata().intensity.multiplier();
                acc.scores
                    .add(*emotion, matched as f64 * match_value * weight * multiplier);
                acc.total_weight += weight;
            }
        }

        acc
    }
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty()
        && tokens.len() >= phrase.len()
        && tokens.windows(phrase.len()).any(|window| {
            window
                .iter()
                .zip(phrase)
                .all(|(token, keyword)| token_matches(token, keyword))
        })
}

fn token_matches(token: &str, keyword: &str) -> bool {
    if token == keyword {
        return true;
    }

    let inflected = token
        .strip_prefix(keyword)
        .is_some_and(|ending| INFLECTIONS.contains(&ending));
    let e_dropped = keyword
        .strip_suffix('e')
        .and_then(|stem| token.strip_prefix(stem))
        .is_some_and(|ending| E_DROP_INFLECTIONS.contains(&ending));

    inflected || e_dropped
}

fn apply_polarity_bias(mut scores: EmotionVector, sentiment: TextSentiment) -> EmotionVector {
    let polarity = sentiment.polarity;
    if polarity > POLARITY_THRESHOLD {
        for emotion in POSITIVE_LEANING {
            scores.scale(emotion, 1.0 + polarity);
        }
    } else if polarity < -POLARITY_THRESHOLD {
        for emotion in NEGATIVE_LEANING {
            scores.scale(emotion, 1.0 + polarity.abs());
        }
    }

    if sentiment.subjectivity > SUBJECTIVITY_THRESHOLD {
        for emotion in HIGHLY_SUBJECTIVE {
            scores.scale(emotion, 1.0 + sentiment.subjectivity * 0.5);
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation_lowers_score() {
        let scorer = LexicalScorer::new();
        let plain = scorer.score("I am happy").get(Emotion::Happy);
        let negated = scorer.score("I am not happy").get(Emotion::Happy);
        assert!(negated < plain, "negated {} >= plain {}", negated, plain);
        assert!(negated > 0.0);
    }

    #[test]
    fn test_only_listed_markers_negate() {
        let scorer = LexicalScorer::new();
        let plain = scorer.score("She is happy").get(Emotion::Happy);
        assert_eq!(scorer.score("She isn't happy").get(Emotion::Happy), plain);
        assert!(scorer.score("She won't be happy").get(Emotion::Happy) < plain);
    }

    #[test]
    fn test_amplifier_raises_score() {
        let scorer = LexicalScorer::new();
        let plain = scorer.score("I am angry").get(Emotion::Angry);
        let amplified = scorer.score("I am extremely angry").get(Emotion::Angry);
        assert!(amplified > plain, "amplified {} <= plain {}", amplified, plain);
    }

    #[test]
    fn test_no_keywords_yields_zero_vector() {
        let scorer = LexicalScorer::new();
        let vector = scorer.score("The train leaves at nine");
        assert_eq!(vector.total(), 0.0);
        assert_eq!(vector.iter().count(), Emotion::COUNT);
    }

    #[test]
    fn test_blank_and_punctuation_only_text() {
        let scorer = LexicalScorer::new();
        assert_eq!(scorer.score("").total(), 0.0);
        assert_eq!(scorer.score("?!..").total(), 0.0);
    }

    #[test]
    fn test_multi_word_keyword_matches_as_phrase() {
        let scorer = LexicalScorer::new();
        assert!(scorer.score("I feel so let down").get(Emotion::Disappointment) > 0.0);
        assert_eq!(scorer.score("let me sit down").get(Emotion::Disappointment), 0.0);
    }

    #[test]
    fn test_keywords_match_whole_tokens_only() {
        let scorer = LexicalScorer::new();
        // "mad" must not match inside "made"
        assert_eq!(scorer.score("We made dinner").get(Emotion::Angry), 0.0);
    }

    #[test]
    fn test_inflected_keywords_match() {
        let scorer = LexicalScorer::new();
        assert!(scorer.score("I loved it").get(Emotion::Love) > 0.0);
        assert!(scorer.score("She admired the view").get(Emotion::Admiration) > 0.0);
        assert!(scorer.score("They keep loving that song").get(Emotion::Love) > 0.0);
        assert!(scorer.score("He was annoyed and left").get(Emotion::Anger) > 0.0);
    }

    #[test]
    fn test_token_matching_rules() {
        assert!(token_matches("love", "love"));
        assert!(token_matches("loves", "love"));
        assert!(token_matches("hated", "hate"));
        assert!(token_matches("admiring", "admire"));
        assert!(token_matches("madly", "mad"));
        assert!(!token_matches("made", "mad"));
        assert!(!token_matches("downtown", "down"));
        assert!(!token_matches("rags", "rage"));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = LexicalScorer::new();
        let text = "I am so grateful. But also a bit worried about tomorrow!";
        assert_eq!(scorer.score(text), scorer.score(text));
    }

    #[test]
    fn test_all_scores_non_negative() {
        let scorer = LexicalScorer::new();
        let vector = scorer.score("I hate this. I'm not scared, never afraid. Very proud!");
        assert!(vector.iter().all(|(_, v)| v >= 0.0));
    }

    #[test]
    fn test_positive_polarity_boosts_positive_subset() {
        let boosted = apply_polarity_bias(
            EmotionVector::from_values(&[1.0; Emotion::COUNT]),
            TextSentiment {
                polarity: 0.5,
                subjectivity: 0.0,
            },
        );
        assert_eq!(boosted.get(Emotion::Happy), 1.5);
        assert_eq!(boosted.get(Emotion::Sad), 1.0);
    }

    #[test]
    fn test_negative_polarity_boosts_negative_subset() {
        let boosted = apply_polarity_bias(
            EmotionVector::from_values(&[1.0; Emotion::COUNT]),
            TextSentiment {
                polarity: -0.6,
                subjectivity: 0.0,
            },
        );
        for emotion in NEGATIVE_LEANING {
            assert!((boosted.get(emotion) - 1.6).abs() < 1e-12, "{} not boosted", emotion);
        }
        assert_eq!(boosted.get(Emotion::Happy), 1.0);
        assert_eq!(boosted.get(Emotion::Mildness), 1.0);
    }

    #[test]
    fn test_weak_polarity_leaves_scores_alone() {
        let scores = EmotionVector::from_values(&[1.0; Emotion::COUNT]);
        let unchanged = apply_polarity_bias(
            scores,
            TextSentiment {
                polarity: -0.05,
                subjectivity: 0.2,
            },
        );
        assert_eq!(unchanged, scores);
    }

    #[test]
    fn test_subjectivity_boosts_subjective_subset() {
        let boosted = apply_polarity_bias(
            EmotionVector::from_values(&[1.0; Emotion::COUNT]),
            TextSentiment {
                polarity: 0.0,
                subjectivity: 0.8,
            },
        );
        assert!((boosted.get(Emotion::Love) - 1.4).abs() < 1e-12);
        assert_eq!(boosted.get(Emotion::Happy), 1.0);
    }
}
