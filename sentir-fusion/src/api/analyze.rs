//! Sentiment analysis endpoint
//!
//! POST /api/analyze-sentiment with `{"text": "...", "language": "ta"}`.
//! Blank text is answered with the neutral default record, not an error.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::assembler::FusionResult;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Longest accepted language tag (BCP 47 upper bound)
const MAX_LANGUAGE_TAG_LEN: usize = 35;

/// Analysis request body
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    /// Language tag, `auto` or absent for detection
    #[serde(default)]
    pub language: Option<String>,
}

/// POST /api/analyze-sentiment
pub async fn analyze_sentiment(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<FusionResult>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let language = validate_language(request.language.as_deref())?;

    // Panics surface as a 500 instead of dropping the connection
    let engine = Arc::clone(&state.engine);
    let outcome = tokio::spawn(async move {
        engine.analyze(&request.text, language.as_deref()).await
    })
    .await;

    match outcome {
        Ok(result) => {
            *state.last_error.write().await = result.error.clone();
            Ok(Json(result))
        }
        Err(e) => {
            let message = format!("Analysis task failed: {}", e);
            error!(error = %e, "Analysis task failed");
            *state.last_error.write().await = Some(message.clone());
            Err(ApiError::Internal(message))
        }
    }
}

/// Blank tags mean detection; anything but letters, digits, `-` and `_` is rejected
fn validate_language(tag: Option<&str>) -> sentir_common::Result<Option<String>> {
    let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let well_formed = tag.len() <= MAX_LANGUAGE_TAG_LEN
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !well_formed {
        return Err(sentir_common::Error::InvalidInput(format!(
            "Malformed language tag: '{}'",
            tag
        )));
    }

    Ok(Some(tag.to_string()))
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/api/analyze-sentiment", post(analyze_sentiment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language() {
        assert_eq!(validate_language(None).unwrap(), None);
        assert_eq!(validate_language(Some("  ")).unwrap(), None);
        assert_eq!(validate_language(Some("ta-IN")).unwrap(), Some("ta-IN".to_string()));
        assert_eq!(validate_language(Some("auto")).unwrap(), Some("auto".to_string()));
        assert!(validate_language(Some("en; drop")).is_err());
        assert!(validate_language(Some(&"x".repeat(40))).is_err());
    }
}
