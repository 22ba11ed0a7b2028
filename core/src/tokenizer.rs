use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[^a-z0-9\s]").expect("valid regex");
}

/// English function words dropped by [`Tokenizer::default`].
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a","an","the","and","or","but","if","then","else","when","at","by","for","with",
    "about","against","between","into","through","during","before","after","above","below",
    "to","from","up","down","in","out","on","off","over","under","again","further","here",
    "there","why","how","all","any","both","each","few","more","most","other","some","such",
    "no","nor","not","only","own","same","so","than","too","very","can","will","just","is",
    "am","are","was","were","be","been","being","do","does","did","doing","of",
];

#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().copied())
    }
}

impl Tokenizer {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stopwords = stopwords.into_iter().map(|w| Into::<String>::into(w).to_lowercase()).collect();
        Self { stopwords }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Lowercase, turn every character outside `[a-z0-9]` and whitespace into a
    /// separator, split, and drop stopwords. Order and duplicates are preserved.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let normalized = SEPARATORS.replace_all(&lowered, " ");
        normalized
            .split_whitespace()
            .filter(|token| !self.is_stopword(token))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_separates_tokens() {
        let t = Tokenizer::default().tokenize("What's new?Nothing,really");
        assert_eq!(t, vec!["what", "s", "new", "nothing", "really"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let t = Tokenizer::default().tokenize("faq FAQ the faq");
        assert_eq!(t, vec!["faq", "faq", "faq"]);
    }

    #[test]
    fn degenerate_input_is_empty() {
        let tok = Tokenizer::default();
        assert!(tok.tokenize("").is_empty());
        assert!(tok.tokenize("?!... ---").is_empty());
        assert!(tok.tokenize("the and of").is_empty());
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        let t = Tokenizer::default().tokenize("café2go");
        assert_eq!(t, vec!["caf", "2go"]);
    }

    #[test]
    fn custom_stopwords_replace_defaults() {
        let tok = Tokenizer::new(["faq"]);
        assert_eq!(tok.tokenize("the faq list"), vec!["the", "list"]);
    }
}
