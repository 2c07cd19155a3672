//! Capability discovery endpoints
//!
//! - GET /api/supported-languages
//! - GET /api/supported-emotions
//! - GET /api/model-info

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::EmotionSourceConfig;
use crate::router::{language_name, RouteStep};
use crate::taxonomy::{Emotion, EmotionCategory, EmotionMetadata, Intensity};
use crate::AppState;

/// Emotions grouped by sentiment category
#[derive(Debug, Serialize)]
pub struct EmotionCategories {
    pub positive: Vec<Emotion>,
    pub negative: Vec<Emotion>,
    pub neutral: Vec<Emotion>,
}

#[derive(Debug, Serialize)]
pub struct SupportedEmotionsResponse {
    pub supported_emotions: Vec<Emotion>,
    pub emotion_categories: EmotionCategories,
    pub intensity_levels: Vec<Intensity>,
    pub metadata: BTreeMap<Emotion, EmotionMetadata>,
}

/// Static thresholds of the combiner and assembler
#[derive(Debug, Serialize)]
pub struct Thresholds {
    pub confidence_floor: f64,
    pub forced_floor_confidence: f64,
    pub visibility_threshold: f64,
    pub top_emotions: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub providers: Vec<String>,
    pub enhanced_languages: Vec<String>,
    pub baseline_language: String,
    pub enhanced_route: Vec<RouteStep>,
    pub standard_route: Vec<RouteStep>,
    pub emotion_sources: Vec<EmotionSourceConfig>,
    pub lexical_weight: f64,
    pub adaptive_weighting: bool,
    pub provider_timeout_ms: u64,
    pub thresholds: Thresholds,
    pub emotion_count: usize,
}

/// GET /api/supported-languages
///
/// Tag to display name, plus `auto` for detection.
pub async fn supported_languages(State(state): State<AppState>) -> Json<BTreeMap<String, String>> {
    let mut languages: BTreeMap<String, String> = state
        .engine
        .router()
        .supported_languages()
        .into_iter()
        .map(|tag| {
            let name = language_name(&tag);
            (tag, name)
        })
        .collect();
    languages.insert("auto".to_string(), "Auto-detect".to_string());
    Json(languages)
}

/// GET /api/supported-emotions
pub async fn supported_emotions() -> Json<SupportedEmotionsResponse> {
    Json(SupportedEmotionsResponse {
        supported_emotions: Emotion::ALL.to_vec(),
        emotion_categories: EmotionCategories {
            positive: Emotion::in_category(EmotionCategory::Positive),
            negative: Emotion::in_category(EmotionCategory::Negative),
            neutral: Emotion::in_category(EmotionCategory::Neutral),
        },
        intensity_levels: Intensity::ALL.to_vec(),
        metadata: Emotion::ALL.iter().map(|e| (*e, e.metadata())).collect(),
    })
}

/// GET /api/model-info
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let config = state.engine.config();
    let routing = &config.routing;

    Json(ModelInfoResponse {
        providers: state.engine.registry().names(),
        enhanced_languages: routing.enhanced_languages.clone(),
        baseline_language: routing.baseline_language.clone(),
        enhanced_route: routing.enhanced_route.clone(),
        standard_route: routing.standard_route.clone(),
        emotion_sources: config.emotion_sources.clone(),
        lexical_weight: config.lexical_weight,
        adaptive_weighting: config.adaptive_weighting,
        provider_timeout_ms: config.provider_timeout_ms,
        thresholds: Thresholds {
            confidence_floor: config.confidence_floor,
            forced_floor_confidence: config.forced_floor_confidence,
            visibility_threshold: config.visibility_threshold,
            top_emotions: config.top_emotions,
        },
        emotion_count: Emotion::COUNT,
    })
}

/// Build discovery routes
pub fn info_routes() -> Router<AppState> {
    Router::new()
        .route("/api/supported-languages", get(supported_languages))
        .route("/api/supported-emotions", get(supported_emotions))
        .route("/api/model-info", get(model_info))
}
