//! Emotion Mapper
//!
//! Maps an arbitrary emotion classifier's label vocabulary onto the fixed
//! 23-entry taxonomy through static many-to-many tables.
//!
//! # Table Variants
//! - **Weighted:** each source label maps to several emotions with independent
//!   weights in `[0,1]`; every target receives `score * weight`. The vector is
//!   left un-normalized (the combiner normalizes after fusion).
//! - **Legacy:** each source label maps to a list of emotions that share its
//!   score evenly; the whole vector is then normalized to sum 1.
//!
//! # Lookup
//! Labels are matched exactly after trimming and lower-casing. A label with no
//! table entry contributes nothing.

use crate::taxonomy::Emotion;
use crate::types::{sanitize_score, CategoricalScores, EmotionVector, LabelScore};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// Which mapping table a provider's labels go through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    #[default]
    Weighted,
    Legacy,
}

type WeightedTargets = &'static [(Emotion, f64)];

/// GoEmotions and Twitter-emotion labels with per-target weights
static WEIGHTED_TABLE: Lazy<HashMap<&'static str, WeightedTargets>> = Lazy::new(|| {
    use Emotion::*;

    let entries: [(&str, WeightedTargets); 28] = [
        ("admiration", &[(Admiration, 0.9), (Gratitude, 0.3)]),
        ("amusement", &[(Happy, 0.8), (Satisfaction, 0.4)]),
        ("anger", &[(Angry, 0.9), (Anger, 0.9)]),
        ("annoyance", &[(Resentment, 0.8), (Reproach, 0.6), (Angry, 0.4)]),
        ("approval", &[(Satisfaction, 0.8), (Pride, 0.5)]),
        ("caring", &[(Love, 0.8), (Gratitude, 0.5)]),
        ("confusion", &[(Anxious, 0.6), (Distress, 0.4)]),
        ("curiosity", &[(Hope, 0.6), (Admiration, 0.4)]),
        ("desire", &[(Love, 0.7), (Hope, 0.5)]),
        ("disappointment", &[(Disappointment, 0.9), (Sad, 0.6)]),
        ("disapproval", &[(Reproach, 0.8), (Resentment, 0.6)]),
        ("disgust", &[(Hate, 0.8), (Reproach, 0.6)]),
        ("embarrassment", &[(Shame, 0.9), (Distress, 0.5)]),
        ("excitement", &[(Happy, 0.8), (Satisfaction, 0.6)]),
        ("fear", &[(Fear, 0.9), (Anxious, 0.7)]),
        ("gratitude", &[(Gratitude, 0.9), (Admiration, 0.4)]),
        ("grief", &[(Sad, 0.9), (Distress, 0.7)]),
        ("joy", &[(Happy, 0.9), (Satisfaction, 0.6)]),
        ("love", &[(Love, 0.9), (Gratitude, 0.4)]),
        ("nervousness", &[(Anxious, 0.9), (Fear, 0.6)]),
        ("optimism", &[(Hope, 0.8), (Satisfaction, 0.5)]),
        ("pride", &[(Pride, 0.9), (Satisfaction, 0.5)]),
        ("realization", &[(Relief, 0.7), (Satisfaction, 0.4)]),
        ("relief", &[(Relief, 0.9), (Satisfaction, 0.5)]),
        ("remorse", &[(Shame, 0.8), (Disappointment, 0.6)]),
        ("sadness", &[(Sad, 0.9), (Disappointment, 0.6)]),
        ("surprise", &[(Relief, 0.6), (Hope, 0.4)]),
        ("neutral", &[(Mildness, 0.8), (Boredom, 0.3)]),
    ];

    entries.into_iter().collect()
});

/// Coarse labels whose score is split evenly between targets
static LEGACY_TABLE: Lazy<HashMap<&'static str, &'static [Emotion]>> = Lazy::new(|| {
    use Emotion::*;

    let entries: [(&str, &'static [Emotion]); 28] = [
        ("admiration", &[Admiration, Gratitude]),
        ("amusement", &[Happy, Satisfaction]),
        ("anger", &[Angry, Anger, Hate]),
        ("annoyance", &[Resentment, Reproach]),
        ("approval", &[Satisfaction, Pride]),
        ("caring", &[Love, Gratitude]),
        ("confusion", &[Anxious, Distress]),
        ("curiosity", &[Hope, Admiration]),
        ("desire", &[Love, Hope]),
        ("disappointment", &[Disappointment, Sad]),
        ("disapproval", &[Reproach, Resentment]),
        ("disgust", &[Hate, Reproach]),
        ("embarrassment", &[Shame, Distress]),
        ("excitement", &[Happy, Satisfaction]),
        ("fear", &[Fear, Anxious]),
        ("gratitude", &[Gratitude, Admiration]),
        ("grief", &[Sad, Distress]),
        ("joy", &[Happy, Satisfaction]),
        ("love", &[Love, Gratitude]),
        ("nervousness", &[Anxious, Fear]),
        ("optimism", &[Hope, Satisfaction]),
        ("pride", &[Pride, Satisfaction]),
        ("realization", &[Relief, Satisfaction]),
        ("relief", &[Relief, Satisfaction]),
        ("remorse", &[Shame, Disappointment]),
        ("sadness", &[Sad, Disappointment]),
        ("surprise", &[Relief, Hope]),
        ("neutral", &[Mildness, Boredom]),
    ];

    entries.into_iter().collect()
});

/// Stateless mapper over the process-wide tables
#[derive(Debug, Clone, Copy, Default)]
pub struct EmotionMapper;

impl EmotionMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map one provider's raw labels onto the taxonomy
    pub fn map(&self, raw: &[LabelScore], kind: MappingKind) -> EmotionVector {
        match kind {
            MappingKind::Weighted => self.map_weighted(raw),
            MappingKind::Legacy => self.map_legacy(raw),
        }
    }

    fn map_weighted(&self, raw: &[LabelScore]) -> EmotionVector {
        raw.iter().fold(EmotionVector::zeroed(), |mut vector, entry| {
            match WEIGHTED_TABLE.get(canonical_key(&entry.label).as_str()) {
                Some(targets) => {
                    let score = sanitize_score(entry.score);
                    for (emotion, weight) in targets.iter() {
                        vector.add(*emotion, score * weight);
                    }
                }
                None => trace!(label = %entry.label, "No weighted mapping for label"),
            }
            vector
        })
    }

    fn map_legacy(&self, raw: &[LabelScore]) -> EmotionVector {
        let vector = raw.iter().fold(EmotionVector::zeroed(), |mut vector, entry| {
            match LEGACY_TABLE.get(canonical_key(&entry.label).as_str()) {
                Some(targets) => {
                    let share = sanitize_score(entry.score) / targets.len() as f64;
                    for emotion in targets.iter() {
                        vector.add(*emotion, share);
                    }
                }
                None => trace!(label = %entry.label, "No legacy mapping for label"),
            }
            vector
        });

        vector.normalized()
    }
}

fn canonical_key(label: &str) -> String {
    label.trim().to_lowercase()
}
