//! HTTP Server & Routing Integration Tests
//!
//! Drives `build_router` in-process through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use sentir_fusion::config::EngineConfig;
use sentir_fusion::{build_router, AppState, FusionEngine};

fn test_app_state() -> AppState {
    let engine = FusionEngine::from_config(EngineConfig::default()).unwrap();
    AppState::new(engine)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_module_and_providers() {
    let app = build_router(test_app_state());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "sentir-fusion");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["providers"], 1);
    assert!(json.get("last_error").is_none());
}

#[tokio::test]
async fn test_root_serves_health() {
    let app = build_router(test_app_state());
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_analyze_returns_full_result() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(post_json(
            "/api/analyze-sentiment",
            r#"{"text": "What a wonderful and excellent day, I am so happy", "language": "en"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["sentiment"], "positive");
    assert_eq!(json["language"], "en");
    assert_eq!(json["language_name"], "English");
    assert_eq!(json["method"], "lexicon_fallback");

    let scores = json["scores"].as_object().unwrap();
    let sum: f64 = ["positive", "negative", "neutral"]
        .iter()
        .map(|k| scores[*k].as_f64().unwrap())
        .sum();
    assert!((sum - 1.0).abs() < 1e-6);

    let emotions = &json["emotions"];
    assert_eq!(emotions["emotion_scores"].as_object().unwrap().len(), 23);
    assert!(emotions["top_emotions"].as_array().unwrap().len() <= 5);
    assert!(emotions["primary_emotion"].is_string());
    assert!(emotions["category"].is_string());
    assert!(emotions["intensity"].is_string());
}

#[tokio::test]
async fn test_analyze_blank_text_is_not_an_error() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(post_json("/api/analyze-sentiment", r#"{"text": "   "}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["sentiment"], "neutral");
    assert_eq!(json["confidence"], 0.0);
    assert_eq!(json["scores"], json!({"positive": 0.0, "negative": 0.0, "neutral": 1.0}));
    assert_eq!(json["emotions"]["primary_emotion"], "mildness");
}

#[tokio::test]
async fn test_analyze_rejects_missing_text() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(post_json("/api/analyze-sentiment", r#"{"language": "en"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_analyze_rejects_malformed_language_tag() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(post_json(
            "/api/analyze-sentiment",
            r#"{"text": "hello", "language": "en; rm -rf"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_failed_analysis_marks_health_degraded() {
    let mut config = EngineConfig::default();
    config.routing.standard_route.retain(|s| s.provider != "lexicon");
    let state = AppState::new(FusionEngine::from_config(config).unwrap());
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(post_json("/api/analyze-sentiment", r#"{"text": "I love it"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["method"], "fallback");
    assert!(json["error"].as_str().unwrap().starts_with("no sentiment sources available"));

    let health = body_json(app.oneshot(get("/health")).await.unwrap()).await;
    assert_eq!(health["status"], "degraded");
    assert!(health["last_error"].is_string());
}

#[tokio::test]
async fn test_supported_languages() {
    let app = build_router(test_app_state());

    let response = app.oneshot(get("/api/supported-languages")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ta"], "Tamil");
    assert_eq!(json["te"], "Telugu");
    assert_eq!(json["kn"], "Kannada");
    assert_eq!(json["ml"], "Malayalam");
    assert_eq!(json["hi"], "Hindi");
    assert_eq!(json["en"], "English");
    assert_eq!(json["auto"], "Auto-detect");
}

#[tokio::test]
async fn test_supported_emotions() {
    let app = build_router(test_app_state());

    let response = app.oneshot(get("/api/supported-emotions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let emotions = json["supported_emotions"].as_array().unwrap();
    assert_eq!(emotions.len(), 23);
    assert_eq!(emotions[0], "anxious");
    assert_eq!(json["intensity_levels"], json!(["low", "medium", "high"]));

    let categories = &json["emotion_categories"];
    let grouped: usize = ["positive", "negative", "neutral"]
        .iter()
        .map(|c| categories[*c].as_array().unwrap().len())
        .sum();
    assert_eq!(grouped, 23);
    assert_eq!(json["metadata"]["mildness"]["category"], "neutral");
}

#[tokio::test]
async fn test_model_info() {
    let app = build_router(test_app_state());

    let response = app.oneshot(get("/api/model-info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["providers"], json!(["lexicon"]));
    assert_eq!(json["enhanced_languages"], json!(["ta", "te", "kn", "ml"]));
    assert_eq!(json["enhanced_route"].as_array().unwrap().len(), 3);
    assert_eq!(json["standard_route"].as_array().unwrap().len(), 2);
    assert_eq!(json["thresholds"]["confidence_floor"], 0.1);
    assert_eq!(json["thresholds"]["top_emotions"], 5);
    assert_eq!(json["emotion_count"], 23);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = build_router(test_app_state());
    let response = app.oneshot(get("/api/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
