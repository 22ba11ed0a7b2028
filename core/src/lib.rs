pub mod config;
pub mod error;
pub mod index;
pub mod persist;
pub mod responder;
pub mod rules;
pub mod sentiment;
pub mod similarity;
pub mod tokenizer;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use index::{FaqEntry, TermVector, TfIdfIndex};
pub use responder::{Engine, Listing, Reply, ReplySource, Snapshot};
pub use rules::{Clock, FixedClock, RuleKind, SystemClock};
pub use sentiment::Sentiment;
