//! Result Assembler
//!
//! Packages the combiner's sentiment and emotion outputs into one immutable
//! `FusionResult`: attaches the primary emotion's metadata, ranks the top-N
//! visible emotions and stamps latency, language and diagnostics.

use crate::combiner::{Fused, SourceContribution};
use crate::router::language_name;
use crate::taxonomy::{Emotion, EmotionCategory, Intensity};
use crate::types::{EmotionVector, Sentiment, SentimentDistribution};
use serde::Serialize;
use std::time::Duration;

/// Reported `method` when more than one sentiment source survived
pub const METHOD_COMBINED: &str = "combined";
/// Reported `method` when no sentiment source survived
pub const METHOD_FALLBACK: &str = "fallback";
/// Reported `method` for blank input
pub const METHOD_DEFAULT: &str = "default";

/// Coarse quality grade of the emotion analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisQuality {
    High,
    Medium,
    Low,
}

impl AnalysisQuality {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.7 {
            AnalysisQuality::High
        } else if confidence > 0.4 {
            AnalysisQuality::Medium
        } else {
            AnalysisQuality::Low
        }
    }
}

/// One ranked emotion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEmotion {
    pub emotion: Emotion,
    pub score: f64,
    pub category: EmotionCategory,
    pub intensity: Intensity,
}

/// Which fusion a source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Sentiment,
    Emotion,
}

/// A provider that was planned but did not contribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedSource {
    pub kind: SourceKind,
    pub provider: String,
    pub method: String,
    pub error: String,
}

/// Emotion half of the result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionAnalysis {
    pub primary_emotion: Emotion,
    pub emotion_scores: EmotionVector,
    pub confidence: f64,
    pub category: EmotionCategory,
    pub intensity: Intensity,
    pub top_emotions: Vec<TopEmotion>,
    pub analysis_quality: AnalysisQuality,
    pub sources: Vec<SourceContribution>,
}

/// Final combined record of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub scores: SentimentDistribution,
    pub processing_time_ms: f64,
    pub language: String,
    pub language_name: String,
    pub method: String,
    pub sources: Vec<SourceContribution>,
    pub failed_sources: Vec<FailedSource>,
    pub emotions: EmotionAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FusionResult {
    /// Fixed neutral record for blank input; no provider is consulted
    pub fn empty_input(language: Option<&str>) -> Self {
        let language = match language.map(str::trim) {
            Some(tag) if !tag.is_empty() => tag.to_string(),
            _ => "unknown".to_string(),
        };
        let fallback = Emotion::NEUTRAL_FALLBACK.metadata();

        Self {
            sentiment: Sentiment::Neutral,
            confidence: 0.0,
            scores: SentimentDistribution::all_neutral(),
            processing_time_ms: 0.0,
            language_name: language_name(&language),
            language,
            method: METHOD_DEFAULT.to_string(),
            sources: Vec::new(),
            failed_sources: Vec::new(),
            emotions: EmotionAnalysis {
                primary_emotion: Emotion::NEUTRAL_FALLBACK,
                emotion_scores: EmotionVector::default(),
                confidence: 0.0,
                category: fallback.category,
                intensity: fallback.intensity,
                top_emotions: Vec::new(),
                analysis_quality: AnalysisQuality::Low,
                sources: Vec::new(),
            },
            error: None,
        }
    }
}

/// Everything the assembler needs from one analysis
#[derive(Debug, Clone)]
pub struct AssemblyInput {
    pub language: String,
    pub sentiment: Fused<SentimentDistribution>,
    pub emotions: Fused<EmotionVector>,
    pub failures: Vec<FailedSource>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler {
    top_n: usize,
    visibility_threshold: f64,
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new(5, 0.05)
    }
}

impl ResultAssembler {
    pub fn new(top_n: usize, visibility_threshold: f64) -> Self {
        Self {
            top_n,
            visibility_threshold,
        }
    }

    pub fn assemble(&self, input: AssemblyInput) -> FusionResult {
        let AssemblyInput {
            language,
            sentiment,
            emotions,
            failures,
            elapsed,
        } = input;

        let method = match sentiment.contributions.as_slice() {
            [] => METHOD_FALLBACK.to_string(),
            [single] => single.method.clone(),
            _ => METHOD_COMBINED.to_string(),
        };

        let error = sentiment
            .is_default()
            .then(|| no_sources_message(&failures));

        let primary = emotions.label;
        let metadata = primary.metadata();

        FusionResult {
            sentiment: sentiment.label,
            confidence: sentiment.confidence,
            scores: sentiment.scores,
            processing_time_ms: elapsed.as_micros() as f64 / 1000.0,
            language_name: language_name(&language),
            language,
            method,
            sources: sentiment.contributions,
            failed_sources: failures,
            emotions: EmotionAnalysis {
                primary_emotion: primary,
                top_emotions: self.top_emotions(&emotions.scores),
                emotion_scores: emotions.scores,
                confidence: emotions.confidence,
                category: metadata.category,
                intensity: metadata.intensity,
                analysis_quality: AnalysisQuality::from_confidence(emotions.confidence),
                sources: emotions.contributions,
            },
            error,
        }
    }

    /// Up to N emotions above the visibility threshold, highest first
    ///
    /// Equal scores keep taxonomy order.
    pub fn top_emotions(&self, vector: &EmotionVector) -> Vec<TopEmotion> {
        let mut ranked: Vec<(Emotion, f64)> = vector.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .take(self.top_n)
            .filter(|(_, score)| *score > self.visibility_threshold)
            .map(|(emotion, score)| {
                let metadata = emotion.metadata();
                TopEmotion {
                    emotion,
                    score,
                    category: metadata.category,
                    intensity: metadata.intensity,
                }
            })
            .collect()
    }
}

fn no_sources_message(failures: &[FailedSource]) -> String {
    let details: Vec<String> = failures
        .iter()
        .filter(|f| f.kind == SourceKind::Sentiment)
        .map(|f| format!("{} ({}): {}", f.provider, f.method, f.error))
        .collect();
    if details.is_empty() {
        return "no sentiment sources available".to_string();
    }
    format!("no sentiment sources available: {}", details.join("; "))
}
