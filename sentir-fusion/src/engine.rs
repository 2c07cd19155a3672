//! Fusion Engine
//!
//! End-to-end orchestration of one analysis:
//! 1. Blank text short-circuits to the fixed neutral record
//! 2. Resolve the language and plan the sentiment route
//! 3. Dispatch sentiment and emotion providers concurrently
//! 4. Run the lexical pattern scorer
//! 5. Adapt / map provider output into source results
//! 6. Fuse sentiment and emotions independently, then assemble
//!
//! `analyze` never fails: provider failures are recorded as diagnostics and
//! the combiner defaults cover the case where nothing survived.

use crate::adapter::adapt;
use crate::assembler::{AssemblyInput, FailedSource, FusionResult, ResultAssembler, SourceKind};
use crate::combiner::EnsembleCombiner;
use crate::config::EngineConfig;
use crate::lexical_scorer::LexicalScorer;
use crate::mapping::EmotionMapper;
use crate::providers::{ProviderCall, ProviderOutcome, ProviderRegistry};
use crate::router::{PlannedCall, Router};
use crate::types::{EmotionVector, SentimentDistribution, SourceResult};
use sentir_common::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Method identifier of the lexical pattern scorer source
pub const LEXICAL_METHOD: &str = "lexical_patterns";

/// Process-wide analysis engine; cheap to share behind an `Arc`
#[derive(Debug)]
pub struct FusionEngine {
    config: EngineConfig,
    registry: Arc<ProviderRegistry>,
    router: Router,
    mapper: EmotionMapper,
    scorer: LexicalScorer,
    combiner: EnsembleCombiner,
    assembler: ResultAssembler,
}

impl FusionEngine {
    /// Engine over an already-built registry
    pub fn new(config: EngineConfig, registry: ProviderRegistry) -> Self {
        Self {
            router: Router::new(config.routing.clone()),
            mapper: EmotionMapper::new(),
            scorer: LexicalScorer::new(),
            combiner: EnsembleCombiner::new(config.combiner_settings()),
            assembler: ResultAssembler::new(config.top_emotions, config.visibility_threshold),
            registry: Arc::new(registry),
            config,
        }
    }

    /// Validate `config` and build the registry it describes
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let registry = ProviderRegistry::from_config(&config.providers, config.provider_timeout())?;
        Ok(Self::new(config, registry))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Analyze `text`; `language` may be a tag, `auto` or absent
    pub async fn analyze(&self, text: &str, language: Option<&str>) -> FusionResult {
        let request_id = Uuid::new_v4();
        let span = info_span!("analyze", request_id = %request_id);
        self.run(text, language).instrument(span).await
    }

    async fn run(&self, text: &str, language: Option<&str>) -> FusionResult {
        if text.trim().is_empty() {
            debug!("Blank input, returning neutral default");
            return FusionResult::empty_input(language);
        }

        let start = Instant::now();
        let language = self.router.resolve_language(text, language);
        let plan = self.router.plan(text, &language);

        debug!(
            language = %language,
            sentiment_sources = plan.len(),
            emotion_sources = self.config.emotion_sources.len(),
            "Dispatching providers"
        );

        let sentiment_calls: Vec<ProviderCall> = plan
            .iter()
            .map(|p| ProviderCall::new(p.step.provider.as_str(), p.text.as_str()))
            .collect();
        let emotion_calls: Vec<ProviderCall> = self
            .config
            .emotion_sources
            .iter()
            .map(|s| ProviderCall::new(s.provider.as_str(), text))
            .collect();

        let timeout = self.config.provider_timeout();
        let (sentiment_outcomes, emotion_outcomes) = tokio::join!(
            self.registry.dispatch(sentiment_calls, timeout),
            self.registry.dispatch(emotion_calls, timeout),
        );

        let mut failures = Vec::new();
        let sentiment_sources = self.sentiment_sources(&plan, sentiment_outcomes, &mut failures);
        let mut emotion_sources = self.emotion_sources(emotion_outcomes, &mut failures);
        emotion_sources.push(SourceResult::new(
            LEXICAL_METHOD,
            self.scorer.score(text),
            self.config.lexical_weight,
        ));

        let result = self.assembler.assemble(AssemblyInput {
            language,
            sentiment: self.combiner.combine_sentiment(&sentiment_sources),
            emotions: self.combiner.combine_emotions(&emotion_sources),
            failures,
            elapsed: start.elapsed(),
        });

        if let Some(error) = &result.error {
            warn!(error = %error, "Sentiment fell back to default distribution");
        }
        info!(
            language = %result.language,
            sentiment = %result.sentiment,
            confidence = result.confidence,
            primary_emotion = %result.emotions.primary_emotion,
            method = %result.method,
            elapsed_ms = result.processing_time_ms,
            "Analysis complete"
        );

        result
    }

    fn sentiment_sources(
        &self,
        plan: &[PlannedCall],
        outcomes: Vec<ProviderOutcome>,
        failures: &mut Vec<FailedSource>,
    ) -> Vec<SourceResult<SentimentDistribution>> {
        plan.iter()
            .zip(outcomes)
            .filter_map(|(call, outcome)| {
                let step = &call.step;
                match outcome.result.and_then(|labels| adapt(&labels, step.adapter)) {
                    Ok((distribution, label)) => Some(
                        SourceResult::new(step.method.as_str(), distribution, step.weight)
                            .with_label(label),
                    ),
                    Err(e) => {
                        failures.push(FailedSource {
                            kind: SourceKind::Sentiment,
                            provider: outcome.provider,
                            method: step.method.clone(),
                            error: e.to_string(),
                        });
                        None
                    }
                }
            })
            .collect()
    }

    fn emotion_sources(
        &self,
        outcomes: Vec<ProviderOutcome>,
        failures: &mut Vec<FailedSource>,
    ) -> Vec<SourceResult<EmotionVector>> {
        self.config
            .emotion_sources
            .iter()
            .zip(outcomes)
            .filter_map(|(source, outcome)| match outcome.result {
                Ok(labels) => Some(SourceResult::new(
                    source.method.as_str(),
                    self.mapper.map(&labels, source.mapping),
                    source.weight,
                )),
                Err(e) => {
                    failures.push(FailedSource {
                        kind: SourceKind::Emotion,
                        provider: outcome.provider,
                        method: source.method.clone(),
                        error: e.to_string(),
                    });
                    None
                }
            })
            .collect()
    }
}
