use faqbot_core::persist::{seed_faqs, FaqStore};
use faqbot_core::responder::{APOLOGY_REPLY, UNSURE_REPLY};
use faqbot_core::rules::{CLEAR_REPLY, GREETING_REPLY};
use faqbot_core::similarity::cosine;
use faqbot_core::tokenizer::Tokenizer;
use faqbot_core::{Engine, EngineConfig, FaqEntry, ReplySource, Sentiment, TfIdfIndex};
use std::sync::Arc;

fn engine(entries: Vec<FaqEntry>) -> Engine {
    Engine::new(&EngineConfig::default(), entries)
}

/// One overlapping term plus `novel` unseen terms against a one-word question
/// scores exactly 1 / sqrt(1 + novel).
fn padded_query(novel: usize) -> String {
    let mut words = vec!["refund".to_string()];
    words.extend((0..novel).map(|i| format!("zz{i}")));
    words.join(" ")
}

#[test]
fn empty_corpus_takes_generic_fallback() {
    let e = engine(vec![]);
    let reply = e.reply("xyz abc", false);
    assert_eq!(reply.text, UNSURE_REPLY);
    assert_eq!(reply.source, ReplySource::Fallback { sentiment: Sentiment::Neutral });
}

#[test]
fn close_paraphrase_matches_faq() {
    let e = engine(vec![FaqEntry::new("how do i add a new faq", "Click Add FAQ, enter question and answer.")]);
    assert_eq!(e.respond("how to add a new faq"), "Click Add FAQ, enter question and answer.");
}

#[test]
fn greeting_ignores_corpus() {
    let e = engine(vec![FaqEntry::new("hello there", "faq greeting")]);
    assert_eq!(e.respond("hello there"), GREETING_REPLY);
    assert_eq!(engine(vec![]).respond("hello there"), GREETING_REPLY);
}

#[test]
fn negative_fallback_apologises() {
    let e = engine(seed_faqs());
    let reply = e.reply("this is broken and bad", false);
    assert_eq!(reply.text, APOLOGY_REPLY);
    assert_eq!(reply.source, ReplySource::Fallback { sentiment: Sentiment::Negative });
}

#[test]
fn positive_fallback_uses_generic_prompt() {
    let e = engine(seed_faqs());
    assert_eq!(e.respond("awesome zebra"), UNSURE_REPLY);
}

#[test]
fn clear_rule_beats_literal_faq() {
    let e = engine(vec![FaqEntry::new("clear", "this is the faq answer")]);
    let reply = e.reply("clear", false);
    assert_eq!(reply.text, CLEAR_REPLY);
    assert!(reply.clears_transcript());
}

#[test]
fn threshold_boundary() {
    let e = engine(vec![FaqEntry::new("refund", "Refunds take 5 days.")]);

    // 1/sqrt(21) ~ 0.218
    let below = e.reply(&padded_query(20), false);
    assert_eq!(below.text, UNSURE_REPLY);

    // 1/sqrt(20) ~ 0.224
    let above = e.reply(&padded_query(19), false);
    assert_eq!(above.text, "Refunds take 5 days.");
}

#[test]
fn threshold_is_inclusive() {
    let entries = vec![FaqEntry::new("refund", "Refunds take 5 days.")];
    let tok = Tokenizer::default();
    let index = TfIdfIndex::build(&entries, &tok);
    let query = padded_query(3);
    let sim = cosine(&index.vectorize_query(&query, &tok), &index.doc_vectors[0]);

    let at = EngineConfig { similarity_threshold: sim, ..EngineConfig::default() };
    assert_eq!(Engine::new(&at, entries.clone()).respond(&query), "Refunds take 5 days.");

    let over = EngineConfig { similarity_threshold: sim + 1e-9, ..EngineConfig::default() };
    assert_eq!(Engine::new(&over, entries).respond(&query), UNSURE_REPLY);
}

#[test]
fn taught_entry_answers_its_own_question() {
    let e = engine(seed_faqs());
    e.add_entry("what are your shipping rates", "Flat 5 EUR.").unwrap();
    let reply = e.reply("what are your shipping rates", false);
    assert_eq!(reply.text, "Flat 5 EUR.");
    assert!(matches!(reply.source, ReplySource::Faq { position: 5, .. }));
}

#[test]
fn rejected_teach_keeps_corpus() {
    let e = engine(seed_faqs());
    assert!(e.add_entry("", "answer").is_err());
    assert_eq!(e.len(), 4);
    assert_eq!(e.snapshot().index().doc_vectors.len(), 4);
}

#[test]
fn show_faqs_counts_corpus() {
    let e = engine(seed_faqs());
    assert!(e.respond("show faqs").starts_with("I know 4 FAQs"));
}

#[test]
fn readers_never_see_half_built_snapshots() {
    let e = Arc::new(engine(seed_faqs()));
    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..50 {
                e.add_entry(&format!("question number {i}"), "answer").unwrap();
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200 {
                    let snap = e.snapshot();
                    assert_eq!(snap.entries().len(), snap.index().doc_vectors.len());
                    let _ = e.respond("question number 7");
                }
            });
        }
    });
    assert_eq!(e.len(), 54);
}

#[test]
fn store_round_trips_and_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let store = FaqStore::new(dir.path().join("data").join("faqs.tsv"));

    assert!(store.load().unwrap().is_empty());
    let seeded = store.load_or_seed().unwrap();
    assert_eq!(seeded, seed_faqs());
    assert_eq!(store.load().unwrap(), seeded);

    let e = engine(store.load().unwrap());
    let snapshot = e.add_entry("tab\tin question", "answer").unwrap();
    store.save(snapshot.entries()).unwrap();
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.len(), 5);
    assert_eq!(reloaded[4], FaqEntry::new("tab in question", "answer"));
}

#[test]
fn store_skips_malformed_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("faqs.tsv");
    std::fs::write(&path, "good q\tgood a\n\nno tab\n \t blank q\nq2\t a2 \n").unwrap();
    let entries = FaqStore::new(&path).load().unwrap();
    assert_eq!(entries, vec![FaqEntry::new("good q", "good a"), FaqEntry::new("q2", "a2")]);
}
