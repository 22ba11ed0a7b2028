use crate::FaqEntry;
use anyhow::{Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Tab-separated FAQ file: one `question\tanswer` pair per line.
pub struct FaqStore {
    path: PathBuf,
}

impl FaqStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty corpus. Rows without both fields are skipped.
    pub fn load(&self) -> Result<Vec<FaqEntry>> {
        let f = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("open {}", self.path.display())),
        };
        let mut entries = Vec::new();
        for (lineno, line) in BufReader::new(f).lines().enumerate() {
            let line = line.with_context(|| format!("read {}", self.path.display()))?;
            match parse_row(&line) {
                Some(entry) => entries.push(entry),
                None if line.trim().is_empty() => {}
                None => tracing::warn!(line = lineno + 1, path = %self.path.display(), "skipping malformed faq row"),
            }
        }
        tracing::info!(entries = entries.len(), path = %self.path.display(), "loaded faqs");
        Ok(entries)
    }

    pub fn save(&self, entries: &[FaqEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        let f = File::create(&self.path).with_context(|| format!("create {}", self.path.display()))?;
        let mut w = BufWriter::new(f);
        for e in entries {
            writeln!(w, "{}\t{}", clean_field(&e.question), clean_field(&e.answer))?;
        }
        w.flush()?;
        Ok(())
    }

    /// Load the file, installing and writing [`seed_faqs`] when it holds nothing.
    pub fn load_or_seed(&self) -> Result<Vec<FaqEntry>> {
        let entries = self.load()?;
        if !entries.is_empty() {
            return Ok(entries);
        }
        let seeds = seed_faqs();
        self.save(&seeds)?;
        tracing::info!(entries = seeds.len(), path = %self.path.display(), "seeded faqs");
        Ok(seeds)
    }
}

pub fn seed_faqs() -> Vec<FaqEntry> {
    vec![
        FaqEntry::new("what is your purpose", "I answer common questions and learn FAQs you teach me."),
        FaqEntry::new("how do i add a new faq", "Teach me a question and its answer, and I'll remember it."),
        FaqEntry::new("how to clear the chat", "Type 'clear' and press Enter."),
        FaqEntry::new(
            "what nlp do you use",
            "I use tokenization, stopword removal, and TF-IDF similarity to find the best matching FAQ.",
        ),
    ]
}

fn parse_row(line: &str) -> Option<FaqEntry> {
    let (q, a) = line.split_once('\t')?;
    let (q, a) = (q.trim(), a.trim());
    if q.is_empty() || a.is_empty() {
        return None;
    }
    Some(FaqEntry::new(q, a))
}

fn clean_field(text: &str) -> String {
    text.replace(['\t', '\r', '\n'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_first_tab() {
        assert_eq!(parse_row("q\ta\tb"), Some(FaqEntry::new("q", "a\tb")));
        assert_eq!(parse_row(" q \t a "), Some(FaqEntry::new("q", "a")));
        assert_eq!(parse_row("no tab here"), None);
        assert_eq!(parse_row("   \tanswer"), None);
    }

    #[test]
    fn clean_field_strips_delimiters() {
        assert_eq!(clean_field(" a\tb\nc "), "a b c");
    }
}
