//! Classifier Adapter
//!
//! Normalizes one provider's raw `(label, score)` output into a canonical
//! `SentimentDistribution`.
//!
//! # Modes
//! - **TopLabel:** the winning label's score becomes the confidence, the
//!   remaining mass `1 - confidence` is split evenly over the other two labels
//! - **FullDistribution:** the three canonical scores are renormalized by their
//!   sum; used for providers that report every label (e.g. the lexicon provider).
//!   Falls back to TopLabel when a canonical label is missing from the response.
//!
//! # Compound verdict
//! A provider may add a `compound` entry holding a signed valence in `[-1,1]`.
//! It is never a class of its own. In FullDistribution mode it decides the
//! provider's label: `>= 0.05` positive, `<= -0.05` negative, else neutral.

use crate::types::{
    sanitize_score, CategoricalScores, LabelScore, ProviderError, Sentiment, SentimentDistribution,
};
use serde::{Deserialize, Serialize};

/// Label carrying a signed valence instead of a class score
pub const COMPOUND_LABEL: &str = "compound";

/// Compound magnitude needed for a non-neutral verdict
const COMPOUND_THRESHOLD: f64 = 0.05;

/// How a provider's raw output is turned into a distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterMode {
    #[default]
    TopLabel,
    FullDistribution,
}

/// Canonical sentiment of a provider-specific label, if it has one
///
/// Covers index labels (`LABEL_0..2`), named labels in any case, and
/// 1-5 star review labels.
pub fn normalize_label(raw: &str) -> Option<Sentiment> {
    let label = raw.trim().to_lowercase();
    match label.as_str() {
        "label_0" | "negative" | "neg" => Some(Sentiment::Negative),
        "label_1" | "neutral" | "neu" => Some(Sentiment::Neutral),
        "label_2" | "positive" | "pos" => Some(Sentiment::Positive),
        "1 star" | "2 stars" => Some(Sentiment::Negative),
        "3 stars" => Some(Sentiment::Neutral),
        "4 stars" | "5 stars" => Some(Sentiment::Positive),
        _ => None,
    }
}

/// Adapt raw provider output into a distribution plus the provider's own verdict
pub fn adapt(
    raw: &[LabelScore],
    mode: AdapterMode,
) -> Result<(SentimentDistribution, Sentiment), ProviderError> {
    if raw.is_empty() {
        return Err(ProviderError::EmptyResult);
    }

    match mode {
        AdapterMode::TopLabel => adapt_top_label(raw),
        AdapterMode::FullDistribution => match adapt_full_distribution(raw)? {
            Some(adapted) => Ok(adapted),
            None => adapt_top_label(raw),
        },
    }
}

fn is_compound(entry: &LabelScore) -> bool {
    entry.label.trim().eq_ignore_ascii_case(COMPOUND_LABEL)
}

/// Verdict of a signed compound valence
pub fn compound_verdict(compound: f64) -> Sentiment {
    if compound >= COMPOUND_THRESHOLD {
        Sentiment::Positive
    } else if compound <= -COMPOUND_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn adapt_top_label(raw: &[LabelScore]) -> Result<(SentimentDistribution, Sentiment), ProviderError> {
    let mut classes = raw.iter().filter(|entry| !is_compound(entry));
    let mut winner = classes.next().ok_or(ProviderError::EmptyResult)?;
    for candidate in classes {
        if sanitize_score(candidate.score) > sanitize_score(winner.score) {
            winner = candidate;
        }
    }

    let label = normalize_label(&winner.label).ok_or_else(|| {
        ProviderError::Parse(format!("unrecognized sentiment label '{}'", winner.label))
    })?;

    let confidence = sanitize_score(winner.score).min(1.0);
    let remainder = (1.0 - confidence) / 2.0;

    let mut values = [remainder; 3];
    values[label.index()] = confidence;

    Ok((SentimentDistribution::from_values(&values), label))
}

/// `Ok(None)` when the response does not cover all three canonical labels
fn adapt_full_distribution(
    raw: &[LabelScore],
) -> Result<Option<(SentimentDistribution, Sentiment)>, ProviderError> {
    let mut sums = [0.0; 3];
    let mut seen = [false; 3];
    let mut compound = None;

    for entry in raw {
        if is_compound(entry) {
            compound = entry.score.is_finite().then_some(entry.score);
        } else if let Some(sentiment) = normalize_label(&entry.label) {
            sums[sentiment.index()] += sanitize_score(entry.score);
            seen[sentiment.index()] = true;
        }
    }

    if !seen.iter().all(|s| *s) {
        return Ok(None);
    }

    let total: f64 = sums.iter().sum();
    if total <= 0.0 {
        return Err(ProviderError::EmptyResult);
    }

    let distribution =
        SentimentDistribution::from_values(&sums.map(|value| value / total));
    let label = match compound {
        Some(compound) => compound_verdict(compound),
        None => distribution.argmax().0,
    };
    Ok(Some((distribution, label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> Vec<LabelScore> {
        pairs.iter().map(|(l, s)| LabelScore::new(*l, *s)).collect()
    }

    #[test]
    fn test_label_normalization_table() {
        assert_eq!(normalize_label("LABEL_0"), Some(Sentiment::Negative));
        assert_eq!(normalize_label("LABEL_1"), Some(Sentiment::Neutral));
        assert_eq!(normalize_label("LABEL_2"), Some(Sentiment::Positive));
        assert_eq!(normalize_label("NEGATIVE"), Some(Sentiment::Negative));
        assert_eq!(normalize_label("Positive"), Some(Sentiment::Positive));
        assert_eq!(normalize_label("5 stars"), Some(Sentiment::Positive));
        assert_eq!(normalize_label("1 star"), Some(Sentiment::Negative));
        assert_eq!(normalize_label("joy"), None);
    }

    #[test]
    fn test_top_label_distributes_remaining_mass() {
        let raw = scores(&[("LABEL_2", 0.8), ("LABEL_0", 0.15), ("LABEL_1", 0.05)]);
        let (dist, label) = adapt(&raw, AdapterMode::TopLabel).unwrap();

        assert_eq!(label, Sentiment::Positive);
        assert!((dist.positive() - 0.8).abs() < 1e-12);
        assert!((dist.negative() - 0.1).abs() < 1e-12);
        assert!((dist.neutral() - 0.1).abs() < 1e-12);
        assert!((dist.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_label_clamps_out_of_range_scores() {
        let raw = scores(&[("NEGATIVE", 1.7)]);
        let (dist, label) = adapt(&raw, AdapterMode::TopLabel).unwrap();
        assert_eq!(label, Sentiment::Negative);
        assert_eq!(dist.negative(), 1.0);
        assert_eq!(dist.positive(), 0.0);
    }

    #[test]
    fn test_empty_output_is_unavailable() {
        assert!(matches!(
            adapt(&[], AdapterMode::TopLabel),
            Err(ProviderError::EmptyResult)
        ));
    }

    #[test]
    fn test_unknown_winner_label_is_parse_error() {
        let raw = scores(&[("sarcasm", 0.9)]);
        assert!(matches!(
            adapt(&raw, AdapterMode::TopLabel),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_full_distribution_renormalizes() {
        let raw = scores(&[("positive", 0.2), ("negative", 0.2), ("neutral", 0.6)]);
        let (dist, label) = adapt(&raw, AdapterMode::FullDistribution).unwrap();
        assert_eq!(label, Sentiment::Neutral);
        assert!((dist.neutral() - 0.6).abs() < 1e-12);

        let raw = scores(&[("positive", 2.0), ("negative", 1.0), ("neutral", 1.0)]);
        let (dist, _) = adapt(&raw, AdapterMode::FullDistribution).unwrap();
        assert!((dist.positive() - 0.5).abs() < 1e-12);
        assert!((dist.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_distribution_falls_back_to_top_label() {
        let raw = scores(&[("POSITIVE", 0.9), ("NEGATIVE", 0.1)]);
        let (dist, label) = adapt(&raw, AdapterMode::FullDistribution).unwrap();
        assert_eq!(label, Sentiment::Positive);
        assert!((dist.neutral() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_compound_decides_full_distribution_label() {
        // neutral share dominates, the compound valence still reads positive
        let raw = scores(&[
            ("positive", 0.275),
            ("negative", 0.0),
            ("neutral", 0.725),
            ("compound", 0.586),
        ]);
        let (dist, label) = adapt(&raw, AdapterMode::FullDistribution).unwrap();
        assert_eq!(label, Sentiment::Positive);
        assert!((dist.neutral() - 0.725).abs() < 1e-12);
        assert!((dist.total() - 1.0).abs() < 1e-9);

        let raw = scores(&[
            ("positive", 0.3),
            ("negative", 0.1),
            ("neutral", 0.6),
            ("compound", -0.2),
        ]);
        let (_, label) = adapt(&raw, AdapterMode::FullDistribution).unwrap();
        assert_eq!(label, Sentiment::Negative);
    }

    #[test]
    fn test_compound_verdict_thresholds() {
        assert_eq!(compound_verdict(0.05), Sentiment::Positive);
        assert_eq!(compound_verdict(0.049), Sentiment::Neutral);
        assert_eq!(compound_verdict(-0.049), Sentiment::Neutral);
        assert_eq!(compound_verdict(-0.05), Sentiment::Negative);
    }

    #[test]
    fn test_top_label_ignores_compound_entry() {
        let raw = scores(&[("compound", 0.9), ("neutral", 0.6), ("positive", 0.4)]);
        let (_, label) = adapt(&raw, AdapterMode::TopLabel).unwrap();
        assert_eq!(label, Sentiment::Neutral);
    }

    #[test]
    fn test_full_distribution_all_zero_is_empty() {
        let raw = scores(&[("positive", 0.0), ("negative", 0.0), ("neutral", 0.0)]);
        assert!(matches!(
            adapt(&raw, AdapterMode::FullDistribution),
            Err(ProviderError::EmptyResult)
        ));
    }
}
