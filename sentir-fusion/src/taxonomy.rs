//! Emotion Taxonomy
//!
//! The closed 23-entry emotion vocabulary shared by every emotion source,
//! with its static per-emotion metadata and keyword lists.
//!
//! # Ordering
//! `Emotion::ALL` is the canonical enumeration order. Every tie between
//! equal scores (primary emotion, top-N ranking) is resolved in favour of
//! the emotion that appears first here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 23 emotions of the fixed taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Anxious,
    Angry,
    Sad,
    Happy,
    Hate,
    Satisfaction,
    Gratitude,
    Reproach,
    Distress,
    Pride,
    Fear,
    Mildness,
    Pity,
    Boredom,
    Shame,
    Disappointment,
    Hope,
    Resentment,
    Love,
    Gloating,
    Anger,
    Relief,
    Admiration,
}

/// Sentiment-level grouping of an emotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Positive,
    Negative,
    Neutral,
}

/// How strongly an emotion is typically expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Low, Intensity::Medium, Intensity::High];

    /// Keyword-score multiplier used by the lexical scorer
    pub fn multiplier(self) -> f64 {
        match self {
            Intensity::Low => 0.7,
            Intensity::Medium => 1.0,
            Intensity::High => 1.3,
        }
    }
}

/// Static per-emotion record, identical for the whole process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionMetadata {
    pub category: EmotionCategory,
    pub intensity: Intensity,
}

/// Emotions boosted when the overall text polarity is clearly positive
pub const POSITIVE_LEANING: [Emotion; 8] = [
    Emotion::Happy,
    Emotion::Satisfaction,
    Emotion::Gratitude,
    Emotion::Love,
    Emotion::Pride,
    Emotion::Hope,
    Emotion::Relief,
    Emotion::Admiration,
];

/// Emotions boosted when the overall text polarity is clearly negative
pub const NEGATIVE_LEANING: [Emotion; 8] = [
    Emotion::Sad,
    Emotion::Angry,
    Emotion::Anxious,
    Emotion::Fear,
    Emotion::Hate,
    Emotion::Distress,
    Emotion::Shame,
    Emotion::Disappointment,
];

/// Emotions boosted when the text is highly subjective
pub const HIGHLY_SUBJECTIVE: [Emotion; 5] = [
    Emotion::Love,
    Emotion::Hate,
    Emotion::Pride,
    Emotion::Shame,
    Emotion::Admiration,
];

impl Emotion {
    /// Size of the taxonomy
    pub const COUNT: usize = 23;

    /// Canonical enumeration order
    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Anxious,
        Emotion::Angry,
        Emotion::Sad,
        Emotion::Happy,
        Emotion::Hate,
        Emotion::Satisfaction,
        Emotion::Gratitude,
        Emotion::Reproach,
        Emotion::Distress,
        Emotion::Pride,
        Emotion::Fear,
        Emotion::Mildness,
        Emotion::Pity,
        Emotion::Boredom,
        Emotion::Shame,
        Emotion::Disappointment,
        Emotion::Hope,
        Emotion::Resentment,
        Emotion::Love,
        Emotion::Gloating,
        Emotion::Anger,
        Emotion::Relief,
        Emotion::Admiration,
    ];

    /// Designated neutral / low-intensity emotion used for defaults and the confidence floor
    pub const NEUTRAL_FALLBACK: Emotion = Emotion::Mildness;

    /// Position in `Emotion::ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anxious => "anxious",
            Emotion::Angry => "angry",
            Emotion::Sad => "sad",
            Emotion::Happy => "happy",
            Emotion::Hate => "hate",
            Emotion::Satisfaction => "satisfaction",
            Emotion::Gratitude => "gratitude",
            Emotion::Reproach => "reproach",
            Emotion::Distress => "distress",
            Emotion::Pride => "pride",
            Emotion::Fear => "fear",
            Emotion::Mildness => "mildness",
            Emotion::Pity => "pity",
            Emotion::Boredom => "boredom",
            Emotion::Shame => "shame",
            Emotion::Disappointment => "disappointment",
            Emotion::Hope => "hope",
            Emotion::Resentment => "resentment",
            Emotion::Love => "love",
            Emotion::Gloating => "gloating",
            Emotion::Anger => "anger",
            Emotion::Relief => "relief",
            Emotion::Admiration => "admiration",
        }
    }

    /// Static category / intensity record
    pub fn metadata(self) -> EmotionMetadata {
        use EmotionCategory::{Negative, Neutral, Positive};
        use Intensity::{High, Low, Medium};

        let (category, intensity) = match self {
            Emotion::Anxious => (Negative, Medium),
            Emotion::Angry => (Negative, High),
            Emotion::Sad => (Negative, Medium),
            Emotion::Happy => (Positive, High),
            Emotion::Hate => (Negative, High),
            Emotion::Satisfaction => (Positive, Medium),
            Emotion::Gratitude => (Positive, Medium),
            Emotion::Reproach => (Negative, Medium),
            Emotion::Distress => (Negative, High),
            Emotion::Pride => (Positive, Medium),
            Emotion::Fear => (Negative, High),
            Emotion::Mildness => (Neutral, Low),
            Emotion::Pity => (Negative, Low),
            Emotion::Boredom => (Neutral, Low),
            Emotion::Shame => (Negative, Medium),
            Emotion::Disappointment => (Negative, Medium),
            Emotion::Hope => (Positive, Medium),
            Emotion::Resentment => (Negative, Medium),
            Emotion::Love => (Positive, High),
            Emotion::Gloating => (Negative, Low),
            Emotion::Anger => (Negative, High),
            Emotion::Relief => (Positive, Medium),
            Emotion::Admiration => (Positive, Medium),
        };

        EmotionMetadata {
            category,
            intensity,
        }
    }

    /// Lower-case keywords and short phrases signalling this emotion
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Emotion::Anxious => &["anxious", "worried", "nervous", "uneasy", "concerned", "restless", "tense"],
            Emotion::Angry => &["angry", "furious", "mad", "rage", "outraged", "livid", "irritated"],
            Emotion::Sad => &["sad", "depressed", "down", "blue", "melancholy", "sorrowful", "dejected"],
            Emotion::Happy => &["happy", "joyful", "cheerful", "delighted", "elated", "ecstatic", "pleased"],
            Emotion::Hate => &["hate", "despise", "loathe", "detest", "abhor", "resent"],
            Emotion::Satisfaction => &["satisfied", "content", "pleased", "fulfilled", "gratified"],
            Emotion::Gratitude => &["grateful", "thankful", "appreciate", "blessed"],
            Emotion::Reproach => &["reproach", "blame", "criticize", "condemn", "disapprove"],
            Emotion::Distress => &["distressed", "troubled", "anguished", "tormented", "suffering"],
            Emotion::Pride => &["proud", "accomplished", "achieved", "successful", "confident"],
            Emotion::Fear => &["afraid", "scared", "terrified", "frightened", "fearful"],
            Emotion::Mildness => &["calm", "peaceful", "gentle", "mild", "serene"],
            Emotion::Pity => &["pity", "sympathy", "compassion", "sorry for", "feel bad"],
            Emotion::Boredom => &["bored", "dull", "tedious", "monotonous", "uninteresting"],
            Emotion::Shame => &["ashamed", "embarrassed", "humiliated", "guilty"],
            Emotion::Disappointment => &["disappointed", "let down", "frustrated", "disillusioned"],
            Emotion::Hope => &["hopeful", "optimistic", "confident", "expecting"],
            Emotion::Resentment => &["resentful", "bitter", "grudge", "indignant"],
            Emotion::Love => &["love", "adore", "cherish", "treasure", "devoted"],
            Emotion::Gloating => &["gloating", "smug", "self-satisfied", "triumphant"],
            Emotion::Anger => &["anger", "wrath", "fury", "irritated", "annoyed"],
            Emotion::Relief => &["relieved", "reassured", "comforted", "eased"],
            Emotion::Admiration => &["admire", "respect", "impressed", "amazed", "wonderful"],
        }
    }

    /// All emotions of one category, in enumeration order
    pub fn in_category(category: EmotionCategory) -> Vec<Emotion> {
        Emotion::ALL
            .iter()
            .copied()
            .filter(|e| e.metadata().category == category)
            .collect()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == needle)
            .ok_or_else(|| format!("Unknown emotion: {}", s))
    }
}
