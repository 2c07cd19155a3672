//! Language Router
//!
//! Chooses which sentiment providers to invoke for a request.
//!
//! # Policy
//! - Languages in the enhanced-support set go through a cross-lingual
//!   classifier, an English classifier on transliteration-cleaned text and the
//!   lexicon fallback (weights 0.5 / 0.3 / 0.2 by default)
//! - Every other language goes through the primary classifier plus the
//!   lexicon fallback
//!
//! # Detection
//! Without a usable tag the language is inferred from the dominant Unicode
//! script of the text, defaulting to the baseline language.

use crate::adapter::AdapterMode;
use serde::{Deserialize, Serialize};

/// Unicode script blocks recognized by detection, in tie-break priority order
const SCRIPT_RANGES: [(char, char, &str); 5] = [
    ('\u{0B80}', '\u{0BFF}', "ta"),
    ('\u{0C00}', '\u{0C7F}', "te"),
    ('\u{0C80}', '\u{0CFF}', "kn"),
    ('\u{0D00}', '\u{0D7F}', "ml"),
    ('\u{0900}', '\u{097F}', "hi"),
];

/// Text transformation applied before a provider call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preprocess {
    #[default]
    None,
    /// Replace non-word characters with spaces and collapse whitespace
    Transliterate,
}

impl Preprocess {
    pub fn apply(self, text: &str) -> String {
        match self {
            Preprocess::None => text.to_string(),
            Preprocess::Transliterate => text
                .split(|c: char| !(c.is_alphanumeric() || c == '_' || c.is_whitespace()))
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// One sentiment source of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Registry name of the provider to call
    pub provider: String,
    /// Method identifier reported in diagnostics
    pub method: String,
    /// Static fusion weight
    pub weight: f64,
    #[serde(default)]
    pub preprocess: Preprocess,
    #[serde(default)]
    pub adapter: AdapterMode,
}

impl RouteStep {
    pub fn new(provider: &str, method: &str, weight: f64) -> Self {
        Self {
            provider: provider.to_string(),
            method: method.to_string(),
            weight,
            preprocess: Preprocess::None,
            adapter: AdapterMode::TopLabel,
        }
    }

    pub fn with_preprocess(mut self, preprocess: Preprocess) -> Self {
        self.preprocess = preprocess;
        self
    }

    pub fn with_adapter(mut self, adapter: AdapterMode) -> Self {
        self.adapter = adapter;
        self
    }
}

/// Routing tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub enhanced_languages: Vec<String>,
    pub baseline_language: String,
    pub enhanced_route: Vec<RouteStep>,
    pub standard_route: Vec<RouteStep>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enhanced_languages: ["ta", "te", "kn", "ml"].iter().map(|s| s.to_string()).collect(),
            baseline_language: "en".to_string(),
            enhanced_route: vec![
                RouteStep::new("multilingual", "multilingual_transformer", 0.5),
                RouteStep::new("primary", "english_transformer", 0.3)
                    .with_preprocess(Preprocess::Transliterate),
                RouteStep::new("lexicon", "lexicon_fallback", 0.2)
                    .with_adapter(AdapterMode::FullDistribution),
            ],
            standard_route: vec![
                RouteStep::new("primary", "transformer", 0.8),
                RouteStep::new("lexicon", "lexicon_fallback", 0.2)
                    .with_adapter(AdapterMode::FullDistribution),
            ],
        }
    }
}

/// A route step bound to the exact text it will classify
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCall {
    pub step: RouteStep,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Router {
    config: RoutingConfig,
}

impl Router {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Normalized caller tag, or the detected language when the tag is absent
    /// or `auto`
    pub fn resolve_language(&self, text: &str, tag: Option<&str>) -> String {
        match tag.map(normalize_tag) {
            Some(tag) if !tag.is_empty() && tag != "auto" => tag,
            _ => self.detect_language(text),
        }
    }

    /// Dominant script language of `text`, or the baseline language
    pub fn detect_language(&self, text: &str) -> String {
        let mut counts = [0usize; SCRIPT_RANGES.len()];
        for c in text.chars() {
            if let Some(i) = SCRIPT_RANGES
                .iter()
                .position(|(start, end, _)| (*start..=*end).contains(&c))
            {
                counts[i] += 1;
            }
        }

        let mut best: Option<usize> = None;
        for (i, count) in counts.iter().enumerate() {
            if *count > 0 && best.map_or(true, |b| *count > counts[b]) {
                best = Some(i);
            }
        }

        match best {
            Some(i) => SCRIPT_RANGES[i].2.to_string(),
            None => self.config.baseline_language.clone(),
        }
    }

    /// Enhanced, script-detectable and baseline languages, without duplicates
    pub fn supported_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = Vec::new();
        let candidates = self
            .config
            .enhanced_languages
            .iter()
            .map(String::as_str)
            .chain(SCRIPT_RANGES.iter().map(|(_, _, tag)| *tag))
            .chain(std::iter::once(self.config.baseline_language.as_str()));
        for tag in candidates {
            if !languages.iter().any(|l| l == tag) {
                languages.push(tag.to_string());
            }
        }
        languages
    }

    pub fn is_enhanced(&self, language: &str) -> bool {
        self.config.enhanced_languages.iter().any(|l| l == language)
    }

    /// Ordered sentiment sources for a language
    pub fn route(&self, language: &str) -> &[RouteStep] {
        if self.is_enhanced(language) {
            &self.config.enhanced_route
        } else {
            &self.config.standard_route
        }
    }

    /// Route steps with their preprocessing applied to `text`
    pub fn plan(&self, text: &str, language: &str) -> Vec<PlannedCall> {
        self.route(language)
            .iter()
            .map(|step| PlannedCall {
                text: step.preprocess.apply(text),
                step: step.clone(),
            })
            .collect()
    }
}

/// Lower-cased primary subtag (`ta-IN` -> `ta`)
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Display name of a language tag
pub fn language_name(language: &str) -> String {
    match language {
        "ta" => "Tamil".to_string(),
        "te" => "Telugu".to_string(),
        "kn" => "Kannada".to_string(),
        "ml" => "Malayalam".to_string(),
        "hi" => "Hindi".to_string(),
        "en" => "English".to_string(),
        other => other.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        Router::new(RoutingConfig::default())
    }

    #[test]
    fn test_detects_scripts() {
        let router = router();
        assert_eq!(router.detect_language("நான் மகிழ்ச்சியாக இருக்கிறேன்"), "ta");
        assert_eq!(router.detect_language("నేను సంతోషంగా ఉన్నాను"), "te");
        assert_eq!(router.detect_language("ನಾನು ಸಂತೋಷವಾಗಿದ್ದೇನೆ"), "kn");
        assert_eq!(router.detect_language("ഞാൻ സന്തോഷവാനാണ്"), "ml");
        assert_eq!(router.detect_language("मैं खुश हूँ"), "hi");
        assert_eq!(router.detect_language("I am happy"), "en");
        assert_eq!(router.detect_language(""), "en");
    }

    #[test]
    fn test_dominant_script_wins() {
        // One Tamil letter inside mostly Telugu text
        assert_eq!(router().detect_language("க నేను సంతోషంగా"), "te");
    }

    #[test]
    fn test_explicit_tag_overrides_detection() {
        let router = router();
        assert_eq!(router.resolve_language("I am happy", Some("ta")), "ta");
        assert_eq!(router.resolve_language("I am happy", Some(" TA-in ")), "ta");
        assert_eq!(router.resolve_language("मैं खुश हूँ", Some("auto")), "hi");
        assert_eq!(router.resolve_language("मैं खुश हूँ", Some("")), "hi");
        assert_eq!(router.resolve_language("hello", None), "en");
    }

    #[test]
    fn test_enhanced_route_has_three_sources() {
        let route = router().route("ta").to_vec();
        let weights: Vec<f64> = route.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![0.5, 0.3, 0.2]);
        assert_eq!(route[2].provider, "lexicon");
    }

    #[test]
    fn test_standard_route_for_other_languages() {
        let router = router();
        for language in ["en", "hi", "fr"] {
            let route = router.route(language);
            assert_eq!(route.len(), 2);
            assert_eq!(route[0].provider, "primary");
            assert_eq!(route[1].provider, "lexicon");
        }
    }

    #[test]
    fn test_plan_applies_transliteration_to_translated_source() {
        let plan = router().plan("vanakkam!!  nanba,  how are you?", "ta");
        assert_eq!(plan[0].text, "vanakkam!!  nanba,  how are you?");
        assert_eq!(plan[1].text, "vanakkam nanba how are you");
    }

    #[test]
    fn test_supported_languages() {
        assert_eq!(router().supported_languages(), vec!["ta", "te", "kn", "ml", "hi", "en"]);
    }

    #[test]
    fn test_language_names() {
        assert_eq!(language_name("ml"), "Malayalam");
        assert_eq!(language_name("fr"), "FR");
    }

    #[test]
    fn test_routing_config_from_partial_toml() {
        let config: RoutingConfig = toml::from_str(
            r#"
            enhanced_languages = ["ta", "hi"]

            [[standard_route]]
            provider = "primary"
            method = "transformer"
            weight = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.enhanced_languages, vec!["ta", "hi"]);
        assert_eq!(config.standard_route.len(), 1);
        assert_eq!(config.standard_route[0].adapter, AdapterMode::TopLabel);
        assert_eq!(config.enhanced_route.len(), 3);
    }
}
