//! Classifier Providers
//!
//! Opaque text classifiers reachable through one capability interface.
//!
//! # Architecture
//! - `Classifier`: `classify(text) -> [(label, score)]`
//! - `ProviderRegistry`: named implementations selected at configuration time
//! - `ProviderRegistry::dispatch`: runs planned calls concurrently, each under a
//!   per-provider timeout; failed or slow providers are reported per call and
//!   never retried
//!
//! # Implementations
//! 1. **http** - text-classification inference endpoint
//! 2. **lexicon** - in-process rule-based sentiment, always registered

pub mod http;
pub mod lexicon;

pub use http::HttpClassifier;
pub use lexicon::LexiconClassifier;

use crate::config::{ProviderConfig, ProviderKind};
use crate::types::{LabelScore, ProviderError};
use async_trait::async_trait;
use futures::future::join_all;
use sentir_common::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Name under which the built-in lexicon provider is registered
pub const LEXICON_PROVIDER: &str = "lexicon";

/// Text classifier capability
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Registry name
    fn name(&self) -> &str;

    /// Classify `text`; scores need not sum to 1
    async fn classify(&self, text: &str) -> std::result::Result<Vec<LabelScore>, ProviderError>;
}

/// One provider invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCall {
    pub provider: String,
    pub text: String,
}

impl ProviderCall {
    pub fn new(provider: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            text: text.into(),
        }
    }
}

/// Result of one provider invocation
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub provider: String,
    pub result: std::result::Result<Vec<LabelScore>, ProviderError>,
}

/// Named classifier implementations, built once at startup
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Classifier>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    /// Registry holding only the built-in lexicon provider
    pub fn new() -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
        };
        registry.register(Arc::new(LexiconClassifier::new()));
        registry
    }

    /// Registry with every configured provider added to the built-ins
    pub fn from_config(configs: &[ProviderConfig], timeout: Duration) -> Result<Self> {
        let mut registry = Self::new();

        for config in configs {
            let classifier: Arc<dyn Classifier> = match config.kind {
                ProviderKind::Lexicon => Arc::new(LexiconClassifier::named(&config.name)),
                ProviderKind::Http => {
                    let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                        Error::Config(format!("Provider '{}' has no endpoint", config.name))
                    })?;
                    let mut classifier = HttpClassifier::new(&config.name, endpoint, timeout)
                        .map_err(|e| Error::Config(format!("Provider '{}': {}", config.name, e)))?;
                    if let Some(model) = &config.model {
                        classifier = classifier.with_model(model);
                    }
                    if let Some(var) = &config.api_token_env {
                        match std::env::var(var) {
                            Ok(token) if !token.trim().is_empty() => {
                                classifier = classifier.with_api_token(token.trim());
                            }
                            _ => warn!(
                                provider = %config.name,
                                env_var = %var,
                                "API token variable not set, calling without authorization"
                            ),
                        }
                    }
                    Arc::new(classifier)
                }
            };

            debug!(provider = %config.name, kind = ?config.kind, "Registering provider");
            registry.register(classifier);
        }

        Ok(registry)
    }

    /// Add or replace a provider under its own name
    pub fn register(&mut self, classifier: Arc<dyn Classifier>) {
        self.providers.insert(classifier.name().to_string(), classifier);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Classifier>> {
        self.providers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Run every call concurrently and wait for all of them
    ///
    /// Outcomes keep the order of `calls`. Each call is bounded by `timeout`;
    /// an empty answer counts as a failure.
    pub async fn dispatch(&self, calls: Vec<ProviderCall>, timeout: Duration) -> Vec<ProviderOutcome> {
        let futures = calls.into_iter().map(|call| {
            let classifier = self.get(&call.provider);
            async move {
                let result = match classifier {
                    None => Err(ProviderError::NotRegistered(call.provider.clone())),
                    Some(classifier) => {
                        match tokio::time::timeout(timeout, classifier.classify(&call.text)).await {
                            Err(_) => Err(ProviderError::Timeout(timeout)),
                            Ok(Ok(labels)) if labels.is_empty() => Err(ProviderError::EmptyResult),
                            Ok(result) => result,
                        }
                    }
                };

                match &result {
                    Ok(labels) => debug!(
                        provider = %call.provider,
                        labels = labels.len(),
                        "Provider call successful"
                    ),
                    Err(e @ ProviderError::NotRegistered(_)) => debug!(
                        provider = %call.provider,
                        error = %e,
                        "Provider not configured (source excluded)"
                    ),
                    Err(e) => warn!(
                        provider = %call.provider,
                        error = %e,
                        "Provider call failed (source excluded)"
                    ),
                }

                ProviderOutcome {
                    provider: call.provider,
                    result,
                }
            }
        });

        join_all(futures).await
    }
}

// ============================================================================
// Mock Classifier for Testing
// ============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Classifier with a canned answer
    pub struct MockClassifier {
        pub name: String,
        pub response: std::result::Result<Vec<LabelScore>, ProviderError>,
        pub delay: Option<Duration>,
    }

    impl MockClassifier {
        pub fn new(name: &str, labels: &[(&str, f64)]) -> Self {
            Self {
                name: name.to_string(),
                response: Ok(labels.iter().map(|(l, s)| LabelScore::new(*l, *s)).collect()),
                delay: None,
            }
        }

        pub fn failing(name: &str) -> Self {
            Self {
                name: name.to_string(),
                response: Err(ProviderError::Unavailable("Mock failure".to_string())),
                delay: None,
            }
        }

        pub fn slow(name: &str, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(name, &[("positive", 1.0)])
            }
        }
    }

    #[async_trait]
    impl Classifier for MockClassifier {
        fn name(&self) -> &str {
            &self.name
        }

        async fn classify(&self, _text: &str) -> std::result::Result<Vec<LabelScore>, ProviderError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.clone()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
