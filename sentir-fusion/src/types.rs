//! Core Types for the Fusion Engine
//!
//! Defines the request-scoped value objects that flow through the engine:
//! - **Provider output:** `LabelScore` lists returned by classifiers
//! - **Canonical scores:** `SentimentDistribution` (3-way) and `EmotionVector` (23-way)
//! - **Per-source contribution:** `SourceResult`
//!
//! Both score shapes implement `CategoricalScores`, which lets the combiner
//! fuse them with a single K-category algorithm.

use crate::taxonomy::Emotion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Provider Output
// ============================================================================

/// One `(label, score)` pair as returned by a classifier provider
///
/// Scores are not required to sum to 1 across a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Provider failure
///
/// Every variant is handled the same way by the engine: the source is
/// excluded from fusion and the message is kept for diagnostics.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Model could not be reached or refused to answer
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Provider did not answer within the per-provider timeout
    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),

    /// Provider answered with no labels
    #[error("Provider returned an empty result")]
    EmptyResult,

    /// Network communication error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failed to parse or interpret the response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Route names a provider that is not in the registry
    #[error("Provider not registered: {0}")]
    NotRegistered(String),
}

// ============================================================================
// Categorical Scores
// ============================================================================

/// Fixed-size score vector over a closed, ordered key set
pub trait CategoricalScores: Clone + Send + Sync + 'static {
    /// Category key (sentiment label or emotion)
    type Key: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Keys in enumeration order; index `i` of `values()` belongs to `keys()[i]`
    fn keys() -> &'static [Self::Key];

    fn values(&self) -> &[f64];

    /// Build from values in enumeration order
    fn from_values(values: &[f64]) -> Self;

    /// All-zero vector
    fn zeroed() -> Self {
        Self::from_values(&vec![0.0; Self::keys().len()])
    }

    /// Largest value and its key; ties go to the first key in enumeration order
    fn argmax(&self) -> (Self::Key, f64) {
        let index = argmax_index(self.values());
        (Self::keys()[index], self.values()[index])
    }

    /// Largest value (0.0 for an all-zero vector)
    fn max_value(&self) -> f64 {
        self.argmax().1
    }

    fn total(&self) -> f64 {
        self.values().iter().sum()
    }
}

/// Index of the largest value, first-seen wins on ties
pub fn argmax_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

/// Clamp provider-supplied scores into the non-negative finite range
pub fn sanitize_score(score: f64) -> f64 {
    if score.is_finite() {
        score.max(0.0)
    } else {
        0.0
    }
}

// ============================================================================
// Sentiment
// ============================================================================

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Canonical enumeration order (also the tie-break order)
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical 3-way sentiment distribution
///
/// Values are non-negative and sum to 1.0 whenever produced by the adapter
/// or the combiner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SentimentScores", into = "SentimentScores")]
pub struct SentimentDistribution {
    values: [f64; 3],
}

/// Wire shape of a sentiment distribution
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SentimentScores {
    positive: f64,
    negative: f64,
    neutral: f64,
}

impl From<SentimentScores> for SentimentDistribution {
    fn from(s: SentimentScores) -> Self {
        SentimentDistribution::new(s.positive, s.negative, s.neutral)
    }
}

impl From<SentimentDistribution> for SentimentScores {
    fn from(d: SentimentDistribution) -> Self {
        SentimentScores {
            positive: d.positive(),
            negative: d.negative(),
            neutral: d.neutral(),
        }
    }
}

impl SentimentDistribution {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            values: [positive, negative, neutral],
        }
    }

    /// Default used when no source survived: nearly uniform, biased to neutral
    pub fn uniform_default() -> Self {
        Self::new(0.33, 0.33, 0.34)
    }

    /// Fully neutral distribution used for blank input
    pub fn all_neutral() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn positive(&self) -> f64 {
        self.values[0]
    }

    pub fn negative(&self) -> f64 {
        self.values[1]
    }

    pub fn neutral(&self) -> f64 {
        self.values[2]
    }

    pub fn get(&self, sentiment: Sentiment) -> f64 {
        self.values[sentiment.index()]
    }
}

impl CategoricalScores for SentimentDistribution {
    type Key = Sentiment;

    fn keys() -> &'static [Sentiment] {
        &Sentiment::ALL
    }

    fn values(&self) -> &[f64] {
        &self.values
    }

    fn from_values(values: &[f64]) -> Self {
        let mut out = [0.0; 3];
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = *value;
        }
        Self { values: out }
    }
}

// ============================================================================
// Emotion Vector
// ============================================================================

/// Score for every emotion of the taxonomy
///
/// Always carries all 23 keys; serialises as a map in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Emotion, f64>", into = "BTreeMap<Emotion, f64>")]
pub struct EmotionVector {
    values: [f64; Emotion::COUNT],
}

impl Default for EmotionVector {
    fn default() -> Self {
        Self {
            values: [0.0; Emotion::COUNT],
        }
    }
}

impl From<BTreeMap<Emotion, f64>> for EmotionVector {
    fn from(map: BTreeMap<Emotion, f64>) -> Self {
        let mut vector = EmotionVector::default();
        for (emotion, score) in map {
            vector.values[emotion.index()] = sanitize_score(score);
        }
        vector
    }
}

impl From<EmotionVector> for BTreeMap<Emotion, f64> {
    fn from(vector: EmotionVector) -> Self {
        vector.iter().collect()
    }
}

impl EmotionVector {
    pub fn get(&self, emotion: Emotion) -> f64 {
        self.values[emotion.index()]
    }

    /// Add a (sanitised) amount to one emotion
    pub fn add(&mut self, emotion: Emotion, amount: f64) {
        self.values[emotion.index()] += sanitize_score(amount);
    }

    /// Multiply one emotion's score
    pub fn scale(&mut self, emotion: Emotion, factor: f64) {
        self.values[emotion.index()] *= factor;
    }

    /// Pairs in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.iter().map(move |e| (*e, self.values[e.index()]))
    }

    /// Copy rescaled to sum to 1.0; unchanged when the total is zero
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total > 0.0 {
            let mut out = *self;
            for value in out.values.iter_mut() {
                *value /= total;
            }
            out
        } else {
            *self
        }
    }
}

impl CategoricalScores for EmotionVector {
    type Key = Emotion;

    fn keys() -> &'static [Emotion] {
        &Emotion::ALL
    }

    fn values(&self) -> &[f64] {
        &self.values
    }

    fn from_values(values: &[f64]) -> Self {
        let mut out = EmotionVector::default();
        for (slot, value) in out.values.iter_mut().zip(values) {
            *slot = *value;
        }
        out
    }
}

// ============================================================================
// Source Result
// ============================================================================

/// One provider's contribution to a fusion call
///
/// Created fresh per request and consumed by the combiner.
#[derive(Debug, Clone)]
pub struct SourceResult<S: CategoricalScores> {
    /// Method identifier used for diagnostics (e.g. "multilingual_transformer")
    pub method: String,
    pub scores: S,
    /// Configured weight before confidence-adaptive boosting
    pub static_weight: f64,
    /// The source's own certainty: the maximum value of `scores`
    pub observed_confidence: f64,
    /// Label this source votes for
    pub label: S::Key,
}

impl<S: CategoricalScores> SourceResult<S> {
    /// Build a source whose vote is the argmax of its own scores
    pub fn new(method: impl Into<String>, scores: S, static_weight: f64) -> Self {
        let (label, observed_confidence) = scores.argmax();
        Self {
            method: method.into(),
            scores,
            static_weight,
            observed_confidence,
            label,
        }
    }

    /// Override the voted label (the adapter knows the provider's own verdict)
    pub fn with_label(mut self, label: S::Key) -> Self {
        self.label = label;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_seen_wins_ties() {
        assert_eq!(argmax_index(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax_index(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax_index(&[0.1, 0.5, 0.2]), 1);
    }

    #[test]
    fn test_sanitize_score() {
        assert_eq!(sanitize_score(-0.3), 0.0);
        assert_eq!(sanitize_score(f64::NAN), 0.0);
        assert_eq!(sanitize_score(f64::INFINITY), 0.0);
        assert_eq!(sanitize_score(0.42), 0.42);
    }

    #[test]
    fn test_sentiment_distribution_serializes_as_named_fields() {
        let dist = SentimentDistribution::new(0.7, 0.1, 0.2);
        let json = serde_json::to_value(dist).unwrap();
        assert_eq!(json["positive"], 0.7);
        assert_eq!(json["negative"], 0.1);
        assert_eq!(json["neutral"], 0.2);

        let back: SentimentDistribution = serde_json::from_value(json).unwrap();
        assert_eq!(back, dist);
    }

    #[test]
    fn test_sentiment_default_is_neutral_biased() {
        let (label, _) = SentimentDistribution::uniform_default().argmax();
        assert_eq!(label, Sentiment::Neutral);
        assert!((SentimentDistribution::uniform_default().total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_emotion_vector_always_has_all_keys() {
        let mut vector = EmotionVector::default();
        vector.add(Emotion::Fear, 0.4);

        let json = serde_json::to_value(vector).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), Emotion::COUNT);
        assert_eq!(map["fear"], 0.4);
        assert_eq!(map["mildness"], 0.0);
    }

    #[test]
    fn test_emotion_vector_partial_map_defaults_to_zero() {
        let vector: EmotionVector = serde_json::from_str(r#"{"love": 0.5}"#).unwrap();
        assert_eq!(vector.get(Emotion::Love), 0.5);
        assert_eq!(vector.iter().count(), Emotion::COUNT);
        assert_eq!(vector.get(Emotion::Hate), 0.0);
    }

    #[test]
    fn test_emotion_vector_normalization() {
        let mut vector = EmotionVector::default();
        vector.add(Emotion::Happy, 3.0);
        vector.add(Emotion::Love, 1.0);

        let normalized = vector.normalized();
        assert!((normalized.total() - 1.0).abs() < 1e-12);
        assert_eq!(normalized.get(Emotion::Happy), 0.75);

        assert_eq!(EmotionVector::default().normalized(), EmotionVector::default());
    }

    #[test]
    fn test_add_ignores_negative_amounts() {
        let mut vector = EmotionVector::default();
        vector.add(Emotion::Sad, -1.0);
        assert_eq!(vector.get(Emotion::Sad), 0.0);
    }

    #[test]
    fn test_source_result_observes_own_confidence() {
        let source = SourceResult::new("test", SentimentDistribution::new(0.1, 0.6, 0.3), 0.5);
        assert_eq!(source.observed_confidence, 0.6);
        assert_eq!(source.label, Sentiment::Negative);

        let overridden = source.with_label(Sentiment::Neutral);
        assert_eq!(overridden.label, Sentiment::Neutral);
        assert_eq!(overridden.observed_confidence, 0.6);
    }
}
