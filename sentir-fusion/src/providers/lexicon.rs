//! Lexicon Classifier
//!
//! In-process rule-based sentiment provider. Never needs the network and
//! answers for any text, so it is the fallback source of every route.

use super::{Classifier, LEXICON_PROVIDER};
use crate::adapter::COMPOUND_LABEL;
use crate::lexicon::polarity_scores;
use crate::types::{LabelScore, ProviderError};
use async_trait::async_trait;

pub struct LexiconClassifier {
    name: String,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self::named(LEXICON_PROVIDER)
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Synchronous classification
    ///
    /// Yields all three canonical proportions plus the compound valence that
    /// decides the verdict.
    pub fn classify_text(&self, text: &str) -> Vec<LabelScore> {
        let scores = polarity_scores(text);
        vec![
            LabelScore::new("positive", scores.positive),
            LabelScore::new("negative", scores.negative),
            LabelScore::new("neutral", scores.neutral),
            LabelScore::new(COMPOUND_LABEL, scores.compound),
        ]
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ProviderError> {
        Ok(self.classify_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{adapt, AdapterMode};
    use crate::types::Sentiment;

    #[tokio::test]
    async fn test_reports_canonical_labels_and_compound() {
        let labels = LexiconClassifier::new().classify("I love it").await.unwrap();
        let names: Vec<&str> = labels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(names, vec!["positive", "negative", "neutral", "compound"]);
    }

    #[test]
    fn test_mostly_neutral_positive_sentence_votes_positive() {
        let labels = LexiconClassifier::new()
            .classify_text("The food at the restaurant down the street was good tonight");
        let (dist, label) = adapt(&labels, AdapterMode::FullDistribution).unwrap();

        assert!(dist.neutral() > dist.positive());
        assert_eq!(label, Sentiment::Positive);
    }

    #[test]
    fn test_plain_statement_votes_neutral() {
        let labels = LexiconClassifier::new().classify_text("The meeting is on Tuesday");
        let (_, label) = adapt(&labels, AdapterMode::FullDistribution).unwrap();
        assert_eq!(label, Sentiment::Neutral);
    }

    #[test]
    fn test_full_distribution_follows_polarity() {
        let classifier = LexiconClassifier::new();

        let (_, label) = adapt(
            &classifier.classify_text("This is a wonderful and excellent day"),
            AdapterMode::FullDistribution,
        )
        .unwrap();
        assert_eq!(label, Sentiment::Positive);

        let (dist, _) = adapt(
            &classifier.classify_text("terrible awful horrible"),
            AdapterMode::FullDistribution,
        )
        .unwrap();
        assert!(dist.negative() > dist.positive());
    }
}
