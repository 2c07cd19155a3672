//! HTTP Classifier
//!
//! Calls a text-classification inference endpoint.
//!
//! # Protocol
//! - Request: `POST {endpoint}` with `{"inputs": text}` (plus `"model"` when set)
//! - Response: `[{label, score}, ...]` or `[[{label, score}, ...]]`
//!
//! Non-2xx answers, transport errors and unparseable bodies map to
//! `ProviderError`; the engine then excludes the source.

use super::Classifier;
use crate::types::{LabelScore, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Maximum error body length kept in diagnostics
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Either shape returned by common inference servers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_labels(self) -> Vec<LabelScore> {
        match self {
            InferenceResponse::Nested(batches) => batches.into_iter().flatten().collect(),
            InferenceResponse::Flat(labels) => labels,
        }
    }
}

pub struct HttpClassifier {
    name: String,
    endpoint: String,
    model: Option<String>,
    api_token: Option<String>,
    timeout: Duration,
    http_client: Client,
}

impl HttpClassifier {
    pub fn new(name: &str, endpoint: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            model: None,
            api_token: None,
            timeout,
            http_client,
        })
    }

    /// Model identifier forwarded with every request
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Bearer token for authenticated endpoints
    pub fn with_api_token(mut self, token: &str) -> Self {
        self.api_token = Some(token.to_string());
        self
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ProviderError> {
        debug!(provider = %self.name, endpoint = %self.endpoint, chars = text.len(), "Calling classifier");

        let mut request = self.http_client.post(&self.endpoint).json(&InferenceRequest {
            inputs: text,
            model: self.model.as_deref(),
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout)
            } else {
                ProviderError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(ProviderError::Unavailable(format!("HTTP {}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        parse_body(&body)
    }
}

fn parse_body(body: &str) -> Result<Vec<LabelScore>, ProviderError> {
    let parsed: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Parse(format!("Unexpected classifier response: {}", e)))?;

    let labels = parsed.into_labels();
    if labels.is_empty() {
        return Err(ProviderError::EmptyResult);
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_body() {
        let labels = parse_body(r#"[{"label": "LABEL_2", "score": 0.91}, {"label": "LABEL_0", "score": 0.09}]"#)
            .unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0], LabelScore::new("LABEL_2", 0.91));
    }

    #[test]
    fn test_parse_nested_body() {
        let labels = parse_body(r#"[[{"label": "joy", "score": 0.7}, {"label": "fear", "score": 0.1}]]"#)
            .unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].label, "fear");
    }

    #[test]
    fn test_parse_empty_and_malformed_bodies() {
        assert!(matches!(parse_body("[]"), Err(ProviderError::EmptyResult)));
        assert!(matches!(parse_body("[[]]"), Err(ProviderError::EmptyResult)));
        assert!(matches!(
            parse_body(r#"{"error": "Model is loading"}"#),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(InferenceRequest {
            inputs: "hello",
            model: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"inputs": "hello"}));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is not expected to accept connections
        let classifier =
            HttpClassifier::new("primary", "http://127.0.0.1:9/classify", Duration::from_secs(2)).unwrap();
        let result = classifier.classify("hello").await;
        assert!(matches!(
            result,
            Err(ProviderError::Transport(_)) | Err(ProviderError::Timeout(_))
        ));
    }
}
