use serde::Serialize;

pub const DEFAULT_POSITIVE: &[&str] = &["good", "great", "love", "awesome", "excellent", "nice", "fast", "thanks", "thank you"];

pub const DEFAULT_NEGATIVE: &[&str] = &[
    "bad", "hate", "worst", "angry", "upset", "error", "issue", "problem", "slow", "fail", "not working",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Positive,
    Neutral,
}

/// Keyword lexicon scored by substring containment, so `fast` also hits `fastest`.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self::new(DEFAULT_POSITIVE.iter().copied(), DEFAULT_NEGATIVE.iter().copied())
    }
}

impl SentimentLexicon {
    pub fn new<P, N, S>(positive: P, negative: N) -> Self
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lower = |w: S| -> String { Into::<String>::into(w).to_lowercase() };
        Self {
            positive: positive.into_iter().map(lower).collect(),
            negative: negative.into_iter().map(lower).collect(),
        }
    }

    /// Positive keywords present minus negative keywords present. Repeats count once.
    pub fn score(&self, text: &str) -> i32 {
        let lowered = text.to_lowercase();
        let hits = |words: &[String]| words.iter().filter(|w| lowered.contains(w.as_str())).count() as i32;
        hits(&self.positive) - hits(&self.negative)
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        match self.score(text) {
            s if s < 0 => Sentiment::Negative,
            s if s > 0 => Sentiment::Positive,
            _ => Sentiment::Neutral,
        }
    }
}
