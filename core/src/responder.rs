use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::index::{FaqEntry, TermVector, TfIdfIndex};
use crate::rules::{Clock, RuleEngine, RuleKind, SystemClock};
use crate::sentiment::{Sentiment, SentimentLexicon};
use crate::similarity::cosine;
use crate::tokenizer::Tokenizer;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

pub const APOLOGY_REPLY: &str = "I'm sorry this is frustrating. Could you rephrase your question or give me a bit more detail? \
I can also learn it: teach me the answer and I'll remember it.";
pub const UNSURE_REPLY: &str = "I'm not sure yet 🤔. Try rephrasing, or teach me the answer for next time!";

/// A corpus together with the index built from exactly that corpus.
#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Vec<FaqEntry>,
    index: TfIdfIndex,
}

impl Snapshot {
    pub fn build(entries: Vec<FaqEntry>, tokenizer: &Tokenizer) -> Self {
        let index = TfIdfIndex::build(&entries, tokenizer);
        tracing::info!(entries = entries.len(), vocabulary = index.vocabulary.len(), "rebuilt faq index");
        Self { entries, index }
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn index(&self) -> &TfIdfIndex {
        &self.index
    }

    /// Highest scoring entry as (zero-based slot, similarity). On equal scores
    /// the earliest inserted entry wins.
    pub fn best_match(&self, query: &TermVector) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        let mut best_sim = -1.0;
        for (i, doc) in self.index.doc_vectors.iter().enumerate() {
            let sim = cosine(query, doc);
            if sim > best_sim {
                best_sim = sim;
                best = Some((i, sim));
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplySource {
    Rule { rule: RuleKind },
    /// `position` is 1-based, matching [`Listing::position`].
    Faq { position: usize, similarity: f64 },
    Fallback { sentiment: Sentiment },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    /// The collaborator should wipe its transcript before showing this reply.
    pub fn clears_transcript(&self) -> bool {
        matches!(self.source, ReplySource::Rule { rule: RuleKind::Clear })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub position: usize,
    pub question: String,
    pub answer: String,
}

/// Hybrid responder: canned rules first, then TF-IDF retrieval, then a
/// sentiment-shaped fallback.
pub struct Engine {
    tokenizer: Tokenizer,
    rules: RuleEngine,
    lexicon: SentimentLexicon,
    threshold: f64,
    state: RwLock<Arc<Snapshot>>,
}

impl Engine {
    pub fn new(config: &EngineConfig, entries: Vec<FaqEntry>) -> Self {
        Self::with_clock(config, entries, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &EngineConfig, entries: Vec<FaqEntry>, clock: Arc<dyn Clock>) -> Self {
        let tokenizer = Tokenizer::new(config.stopwords.iter().cloned());
        let lexicon = SentimentLexicon::new(config.positive_keywords.iter().cloned(), config.negative_keywords.iter().cloned());
        let snapshot = Snapshot::build(entries, &tokenizer);
        Self {
            tokenizer,
            rules: RuleEngine::new(clock),
            lexicon,
            threshold: config.similarity_threshold,
            state: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.read().clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn respond(&self, utterance: &str) -> String {
        self.reply(utterance, false).text
    }

    /// With `diagnostics` set, FAQ answers carry a similarity suffix.
    pub fn reply(&self, utterance: &str, diagnostics: bool) -> Reply {
        let snapshot = self.snapshot();

        if let Some(quick) = self.rules.evaluate(utterance, snapshot.entries.len()) {
            tracing::debug!(rule = ?quick.kind, "rule reply");
            return Reply { text: quick.text, source: ReplySource::Rule { rule: quick.kind } };
        }

        let query = snapshot.index.vectorize_query(utterance, &self.tokenizer);
        match snapshot.best_match(&query) {
            Some((slot, similarity)) if similarity >= self.threshold => {
                tracing::debug!(position = slot + 1, similarity, "faq reply");
                let answer = &snapshot.entries[slot].answer;
                let text = if diagnostics {
                    format!("{answer} (matched via FAQ, sim={similarity:.2})")
                } else {
                    answer.clone()
                };
                Reply { text, source: ReplySource::Faq { position: slot + 1, similarity } }
            }
            best => {
                let sentiment = self.lexicon.classify(utterance);
                tracing::debug!(best = ?best.map(|(_, s)| s), ?sentiment, "fallback reply");
                let text = match sentiment {
                    Sentiment::Negative => APOLOGY_REPLY,
                    Sentiment::Positive | Sentiment::Neutral => UNSURE_REPLY,
                };
                Reply { text: text.to_string(), source: ReplySource::Fallback { sentiment } }
            }
        }
    }

    /// Append an entry and swap in a fully rebuilt snapshot. Line breaks in
    /// either field become spaces. Blank fields are rejected without touching
    /// the corpus.
    pub fn add_entry(&self, question: &str, answer: &str) -> Result<Arc<Snapshot>> {
        let question = single_line(question);
        let answer = single_line(answer);
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }
        if answer.is_empty() {
            return Err(Error::EmptyAnswer);
        }

        let mut state = self.state.write();
        let mut entries = state.entries.clone();
        entries.push(FaqEntry::new(question, answer));
        let next = Arc::new(Snapshot::build(entries, &self.tokenizer));
        *state = Arc::clone(&next);
        Ok(next)
    }

    pub fn entries(&self) -> Vec<Listing> {
        self.snapshot()
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| Listing { position: i + 1, question: e.question.clone(), answer: e.answer.clone() })
            .collect()
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}
