use crate::error::{Error, Result};
use crate::sentiment::{DEFAULT_NEGATIVE, DEFAULT_POSITIVE};
use crate::tokenizer::DEFAULT_STOPWORDS;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.22;

/// Engine tuning. Any field left out of a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum cosine similarity for an FAQ answer to be returned.
    pub similarity_threshold: f64,
    pub stopwords: Vec<String>,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            stopwords: owned(DEFAULT_STOPWORDS),
            positive_keywords: owned(DEFAULT_POSITIVE),
            negative_keywords: owned(DEFAULT_NEGATIVE),
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let t = self.similarity_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(Error::Config(format!("similarity_threshold must be within [0, 1], got {t}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{ "similarity_threshold": 0.5 }"#).unwrap();
        assert_eq!(cfg.similarity_threshold, 0.5);
        assert_eq!(cfg.stopwords.len(), DEFAULT_STOPWORDS.len());
        assert_eq!(cfg.negative_keywords.len(), 11);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = EngineConfig::from_json_str(r#"{ "similarity_threshold": 1.5 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "stopwords": ["faq"] }"#).unwrap();
        let cfg = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.stopwords, vec!["faq".to_string()]);
        assert_eq!(cfg.similarity_threshold, DEFAULT_SIMILARITY_THRESHOLD);
        assert!(matches!(EngineConfig::from_json_file(dir.path().join("missing.json")), Err(Error::Io { .. })));
    }
}
