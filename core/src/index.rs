use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Sparse term -> weight mapping.
pub type TermVector = HashMap<String, f64>;

/// Weight applied to query terms that never appear in a corpus question.
pub const DEFAULT_IDF: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }
}

/// TF-IDF model over the corpus questions. Always built from scratch; there is
/// no incremental update because df and idf depend on every entry.
#[derive(Debug, Clone, Default)]
pub struct TfIdfIndex {
    pub vocabulary: HashSet<String>,
    pub df: HashMap<String, u32>,
    pub idf: HashMap<String, f64>,
    /// Parallel to the corpus the index was built from.
    pub doc_vectors: Vec<TermVector>,
    pub num_docs: u32,
}

impl TfIdfIndex {
    pub fn build(entries: &[FaqEntry], tokenizer: &Tokenizer) -> Self {
        let doc_tokens: Vec<Vec<String>> = entries.iter().map(|e| tokenizer.tokenize(&e.question)).collect();

        let mut vocabulary: HashSet<String> = HashSet::new();
        let mut df: HashMap<String, u32> = HashMap::new();
        for tokens in &doc_tokens {
            let seen_in_doc: HashSet<&String> = tokens.iter().collect();
            for term in seen_in_doc {
                vocabulary.insert(term.clone());
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let num_docs = doc_tokens.len() as u32;
        let n = num_docs.max(1);
        let idf: HashMap<String, f64> = vocabulary
            .iter()
            .map(|term| {
                let df_t = df.get(term).copied().unwrap_or(0);
                (term.clone(), smoothed_idf(n, df_t))
            })
            .collect();

        let doc_vectors = doc_tokens.iter().map(|tokens| weigh(tokens, &idf)).collect();

        Self { vocabulary, df, idf, doc_vectors, num_docs }
    }

    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(DEFAULT_IDF)
    }

    /// Weigh a free-text query against this index's idf table.
    pub fn vectorize_query(&self, text: &str, tokenizer: &Tokenizer) -> TermVector {
        weigh(&tokenizer.tokenize(text), &self.idf)
    }
}

/// `ln((N + 1) / (df + 1)) + 1`, strictly positive and decreasing in `df`.
pub fn smoothed_idf(n: u32, df: u32) -> f64 {
    ((n as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0
}

/// Raw counts divided by the largest count in the same token list.
pub fn term_frequency(tokens: &[String]) -> TermVector {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    let max = counts.values().copied().max().unwrap_or(1) as f64;
    counts.into_iter().map(|(term, c)| (term, c as f64 / max)).collect()
}

fn weigh(tokens: &[String], idf: &HashMap<String, f64>) -> TermVector {
    let mut tf = term_frequency(tokens);
    for (term, w) in tf.iter_mut() {
        *w *= idf.get(term).copied().unwrap_or(DEFAULT_IDF);
    }
    tf
}
