//! Ensemble Combiner
//!
//! Merges N source results into one fused distribution using
//! confidence-adaptive weighted averaging. The same algorithm serves the
//! 3-way sentiment case and the 23-way emotion case through
//! `CategoricalScores`.
//!
//! # Algorithm
//! 1. Drop sources whose static weight is not positive
//! 2. `total = Σ observed_confidence`; when adaptive weighting is on and
//!    `total > 0`, boost each weight by `(1 + observed_confidence / total)`
//! 3. Normalize boosted weights to sum 1
//! 4. `fused[k] = Σ weight_i * scores_i[k]`
//!
//! Sentiment then picks its label by a weighted vote over each source's own
//! label. Emotions take the argmax of the normalized fused vector, falling back
//! to the neutral emotion below the confidence floor.
//!
//! # Example
//! ```rust,ignore
//! // weights 0.5 / 0.3 / 0.2, positive scores 0.9 / 0.2 / 0.5, no boosting
//! // fused positive = 0.5*0.9 + 0.3*0.2 + 0.2*0.5 = 0.61
//! let fused = combiner.combine_sentiment(&sources);
//! ```

use crate::taxonomy::Emotion;
use crate::types::{
    argmax_index, CategoricalScores, EmotionVector, Sentiment, SentimentDistribution, SourceResult,
};
use serde::Serialize;
use tracing::debug;

/// Thresholds and switches of the combiner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinerSettings {
    /// Boost self-certain sources (step 2)
    pub adaptive_weighting: bool,
    /// Emotion max score below which the primary emotion is forced neutral
    pub confidence_floor: f64,
    /// Confidence reported when the floor forces the neutral emotion
    pub forced_floor_confidence: f64,
}

impl Default for CombinerSettings {
    fn default() -> Self {
        Self {
            adaptive_weighting: true,
            confidence_floor: 0.1,
            forced_floor_confidence: 0.5,
        }
    }
}

/// Diagnostic record of one source's part in a fusion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceContribution {
    pub method: String,
    pub static_weight: f64,
    pub observed_confidence: f64,
    /// Final normalized weight after boosting
    pub weight: f64,
    pub label: String,
}

/// Weighted average of the surviving sources
#[derive(Debug, Clone)]
pub struct WeightedFusion<S: CategoricalScores> {
    pub scores: S,
    /// Normalized weight per surviving source, in input order
    pub weights: Vec<f64>,
    pub contributions: Vec<SourceContribution>,
}

/// Output of one combination
#[derive(Debug, Clone)]
pub struct Fused<S: CategoricalScores> {
    pub scores: S,
    pub label: S::Key,
    pub confidence: f64,
    pub contributions: Vec<SourceContribution>,
}

impl<S: CategoricalScores> Fused<S> {
    /// True when no source took part and the defaults were used
    pub fn is_default(&self) -> bool {
        self.contributions.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnsembleCombiner {
    settings: CombinerSettings,
}

impl EnsembleCombiner {
    pub fn new(settings: CombinerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CombinerSettings {
        &self.settings
    }

    /// Steps 1-4; `None` when no source has a positive weight
    pub fn fuse<S: CategoricalScores>(&self, sources: &[SourceResult<S>]) -> Option<WeightedFusion<S>> {
        let active: Vec<&SourceResult<S>> = sources
            .iter()
            .filter(|s| s.static_weight.is_finite() && s.static_weight > 0.0)
            .collect();

        if active.is_empty() {
            return None;
        }

        let total_confidence: f64 = active.iter().map(|s| s.observed_confidence).sum();
        let boosted: Vec<f64> = active
            .iter()
            .map(|s| {
                if self.settings.adaptive_weighting && total_confidence > 0.0 {
                    s.static_weight * (1.0 + s.observed_confidence / total_confidence)
                } else {
                    s.static_weight
                }
            })
            .collect();

        let weight_sum: f64 = boosted.iter().sum();
        if weight_sum <= 0.0 {
            return None;
        }
        let weights: Vec<f64> = boosted.iter().map(|w| w / weight_sum).collect();

        let mut fused = vec![0.0; S::keys().len()];
        for (source, weight) in active.iter().zip(&weights) {
            for (slot, value) in fused.iter_mut().zip(source.scores.values()) {
                *slot += weight * value;
            }

            debug!(
                method = %source.method,
                static_weight = source.static_weight,
                observed_confidence = source.observed_confidence,
                weight = weight,
                label = %source.label,
                "Fusing source"
            );
        }

        let contributions = active
            .iter()
            .zip(&weights)
            .map(|(source, weight)| SourceContribution {
                method: source.method.clone(),
                static_weight: source.static_weight,
                observed_confidence: source.observed_confidence,
                weight: *weight,
                label: source.label.to_string(),
            })
            .collect();

        Some(WeightedFusion {
            scores: S::from_values(&fused),
            weights,
            contributions,
        })
    }

    /// Fused sentiment distribution with a weighted-vote label
    pub fn combine_sentiment(
        &self,
        sources: &[SourceResult<SentimentDistribution>],
    ) -> Fused<SentimentDistribution> {
        let Some(fusion) = self.fuse(sources) else {
            debug!("No sentiment sources, using default distribution");
            return Fused {
                scores: SentimentDistribution::uniform_default(),
                label: Sentiment::Neutral,
                confidence: 0.0,
                contributions: Vec::new(),
            };
        };

        let mut votes = [0.0; 3];
        let voters = sources
            .iter()
            .filter(|s| s.static_weight.is_finite() && s.static_weight > 0.0);
        for (source, weight) in voters.zip(&fusion.weights) {
            votes[source.label.index()] += weight;
        }

        let label = Sentiment::ALL[argmax_index(&votes)];
        let confidence = fusion.scores.get(label);

        debug!(
            label = %label,
            confidence = confidence,
            positive = fusion.scores.positive(),
            negative = fusion.scores.negative(),
            neutral = fusion.scores.neutral(),
            "Sentiment fused"
        );

        Fused {
            scores: fusion.scores,
            label,
            confidence,
            contributions: fusion.contributions,
        }
    }

    /// Normalized fused emotion vector with its primary emotion
    pub fn combine_emotions(&self, sources: &[SourceResult<EmotionVector>]) -> Fused<EmotionVector> {
        let (scores, contributions) = match self.fuse(sources) {
            Some(fusion) => (fusion.scores.normalized(), fusion.contributions),
            None => {
                debug!("No emotion sources, using zero vector");
                (EmotionVector::zeroed(), Vec::new())
            }
        };

        let (primary, max_score) = scores.argmax();
        let (label, confidence) = if max_score < self.settings.confidence_floor {
            (Emotion::NEUTRAL_FALLBACK, self.settings.forced_floor_confidence)
        } else {
            (primary, max_score)
        };

        debug!(
            primary = %label,
            confidence = confidence,
            max_score = max_score,
            "Emotions fused"
        );

        Fused {
            scores,
            label,
            confidence,
            contributions,
        }
    }
}
