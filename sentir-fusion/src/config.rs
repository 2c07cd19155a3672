//! Service and engine configuration
//!
//! `ServiceConfig` is the whole TOML file; every section is optional and
//! falls back to built-in defaults, so a partial file is valid. File location
//! is resolved by `sentir_common::config` (CLI > ENV > user file > defaults).
//!
//! # Example
//! ```toml
//! [server]
//! port = 5730
//!
//! [engine]
//! provider_timeout_ms = 5000
//!
//! [[engine.providers]]
//! name = "primary"
//! kind = "http"
//! endpoint = "http://127.0.0.1:8080/classify"
//! ```

use crate::combiner::CombinerSettings;
use crate::mapping::MappingKind;
use crate::router::RoutingConfig;
use sentir_common::config::{LoggingConfig, ServerConfig};
use sentir_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
}

/// Provider implementation selected for a registry name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Http,
    Lexicon,
}

/// One named provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub kind: ProviderKind,
    /// Inference endpoint (required for `http`)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Model identifier forwarded to the endpoint
    #[serde(default)]
    pub model: Option<String>,
    /// Environment variable holding a bearer token
    #[serde(default)]
    pub api_token_env: Option<String>,
}

/// One model-backed emotion source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSourceConfig {
    pub provider: String,
    pub method: String,
    pub weight: f64,
    #[serde(default)]
    pub mapping: MappingKind,
}

impl EmotionSourceConfig {
    pub fn new(provider: &str, method: &str, weight: f64) -> Self {
        Self {
            provider: provider.to_string(),
            method: method.to_string(),
            weight,
            mapping: MappingKind::Weighted,
        }
    }
}

/// Every static tuning surface of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub provider_timeout_ms: u64,
    pub confidence_floor: f64,
    pub forced_floor_confidence: f64,
    pub top_emotions: usize,
    pub visibility_threshold: f64,
    pub adaptive_weighting: bool,
    pub routing: RoutingConfig,
    pub emotion_sources: Vec<EmotionSourceConfig>,
    /// Static weight of the lexical pattern scorer
    pub lexical_weight: f64,
    pub providers: Vec<ProviderConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 10_000,
            confidence_floor: 0.1,
            forced_floor_confidence: 0.5,
            top_emotions: 5,
            visibility_threshold: 0.05,
            adaptive_weighting: true,
            routing: RoutingConfig::default(),
            emotion_sources: vec![
                EmotionSourceConfig::new("primary_emotion", "primary_model", 0.5),
                EmotionSourceConfig::new("backup_emotion", "backup_model", 0.3),
            ],
            lexical_weight: 0.2,
            providers: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn combiner_settings(&self) -> CombinerSettings {
        CombinerSettings {
            adaptive_weighting: self.adaptive_weighting,
            confidence_floor: self.confidence_floor,
            forced_floor_confidence: self.forced_floor_confidence,
        }
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.provider_timeout_ms == 0 {
            return Err(Error::Config("provider_timeout_ms must be > 0".to_string()));
        }

        for (name, value) in [
            ("confidence_floor", self.confidence_floor),
            ("forced_floor_confidence", self.forced_floor_confidence),
            ("visibility_threshold", self.visibility_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{} must be in [0, 1], got {}", name, value)));
            }
        }

        check_weight("lexical_weight", self.lexical_weight)?;
        for step in self.routing.enhanced_route.iter().chain(&self.routing.standard_route) {
            check_weight(&format!("route step '{}'", step.method), step.weight)?;
        }
        for source in &self.emotion_sources {
            check_weight(&format!("emotion source '{}'", source.method), source.weight)?;
        }

        if self.routing.baseline_language.trim().is_empty() {
            return Err(Error::Config("routing.baseline_language must not be empty".to_string()));
        }

        for (i, provider) in self.providers.iter().enumerate() {
            if provider.name.trim().is_empty() {
                return Err(Error::Config(format!("providers[{}] has an empty name", i)));
            }
            if provider.kind == ProviderKind::Http && provider.endpoint.is_none() {
                return Err(Error::Config(format!(
                    "Provider '{}' of kind http needs an endpoint",
                    provider.name
                )));
            }
        }

        Ok(())
    }
}

fn check_weight(name: &str, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{} weight must be finite and >= 0, got {}", name, weight)))
    }
}
