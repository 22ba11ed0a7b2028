use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

lazy_static! {
    static ref GREETING: Regex =
        Regex::new(r"^(hi|hello|hey|hola|namaste|good (morning|afternoon|evening))\b").expect("valid regex");
    static ref FAREWELL: Regex = Regex::new(r"^(bye|goodbye|see you|thanks|thank you)\b").expect("valid regex");
}

pub const HELP_REPLY: &str = "You can ask about timings, features, simple how-tos, or FAQs.\n\
Commands: 'clear' to clear chat, 'show faqs' to list.\n\
Teach me new Q&A and I will remember it.";
pub const CLEAR_REPLY: &str = "Chat cleared ✅";
pub const GREETING_REPLY: &str = "Hello! How can I help you today?";
pub const FAREWELL_REPLY: &str = "You're welcome! Have a great day 👋";
pub const NAME_REPLY: &str = "I'm a lightweight FAQ assistant. You can train me by teaching new FAQs!";
pub const CAPABILITIES_REPLY: &str =
    "I support real-time chat, FAQ retrieval (TF-IDF), rule-based replies, and on-the-fly training with persistent storage.";
pub const NO_FAQS_REPLY: &str = "No FAQs yet. Teach me some!";

/// Source of the current time for the time rule.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Help,
    Clear,
    Greeting,
    Farewell,
    Time,
    Name,
    Capabilities,
    FaqCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickReply {
    pub kind: RuleKind,
    pub text: String,
}

impl QuickReply {
    fn new(kind: RuleKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// Ordered canned replies. The first matching rule wins.
#[derive(Clone)]
pub struct RuleEngine {
    clock: Arc<dyn Clock>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl RuleEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// `None` means retrieval should run.
    pub fn evaluate(&self, text: &str, faq_count: usize) -> Option<QuickReply> {
        let t = text.trim().to_lowercase();

        if t == "help" || t == "menu" {
            return Some(QuickReply::new(RuleKind::Help, HELP_REPLY));
        }
        if t == "clear" {
            return Some(QuickReply::new(RuleKind::Clear, CLEAR_REPLY));
        }
        if GREETING.is_match(&t) {
            return Some(QuickReply::new(RuleKind::Greeting, GREETING_REPLY));
        }
        if FAREWELL.is_match(&t) {
            return Some(QuickReply::new(RuleKind::Farewell, FAREWELL_REPLY));
        }
        if t.contains("time") {
            return Some(QuickReply::new(RuleKind::Time, format!("Current time: {}", self.current_time())));
        }
        if t.contains("your name") {
            return Some(QuickReply::new(RuleKind::Name, NAME_REPLY));
        }
        if t.contains("what can you do") || t.contains("features") {
            return Some(QuickReply::new(RuleKind::Capabilities, CAPABILITIES_REPLY));
        }
        if t == "show faqs" {
            let text = if faq_count == 0 {
                NO_FAQS_REPLY.to_string()
            } else {
                format!("I know {faq_count} FAQs. Use the FAQ list to view them all.")
            };
            return Some(QuickReply::new(RuleKind::FaqCount, text));
        }
        None
    }

    fn current_time(&self) -> String {
        let now = self.clock.now();
        now.format(&Rfc2822).unwrap_or_else(|_| now.to_string())
    }
}
