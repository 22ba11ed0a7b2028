use anyhow::Result;
use clap::{Parser, Subcommand};
use faqbot_core::persist::FaqStore;
use faqbot_core::{Engine, EngineConfig, Listing, Snapshot};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

const WELCOME: &str = "Hi! I'm your FAQ assistant 🤖.\n\
Ask me anything, or teach me with /teach.\n\
Type 'help' for tips, /list to see what I know, /quit to leave.";

#[derive(Parser)]
#[command(name = "faqbot")]
#[command(about = "Answer questions from a teachable FAQ list", long_about = None)]
struct Cli {
    /// FAQ file (tab-separated question/answer pairs)
    #[arg(long, global = true, default_value = "faqs.tsv")]
    faqs: PathBuf,
    /// Optional engine config (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Append the similarity score to FAQ answers
    #[arg(long, global = true, default_value_t = false)]
    diagnostics: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        text: String,
    },
    /// Teach a new question/answer pair
    Teach {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    /// List every known FAQ
    List,
    /// Interactive chat on stdin
    Chat,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let store = FaqStore::new(&cli.faqs);
    let engine = Engine::new(&config, store.load_or_seed()?);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Ask { text } => {
            if text.trim().is_empty() {
                anyhow::bail!("question must not be empty");
            }
            writeln!(out, "{}", engine.reply(&text, cli.diagnostics).text)?;
        }
        Commands::Teach { question, answer } => {
            teach(&engine, &store, &question, &answer, &mut out)?;
        }
        Commands::List => print_listing(&engine.entries(), &mut out)?,
        Commands::Chat => chat(&engine, &store, cli.diagnostics, io::stdin().lock(), &mut out)?,
    }
    Ok(())
}

fn teach(engine: &Engine, store: &FaqStore, question: &str, answer: &str, out: &mut impl Write) -> Result<()> {
    let snapshot = engine.add_entry(question, answer)?;
    store.save(snapshot.entries())?;
    print_learned(&snapshot, out)
}

fn print_learned(snapshot: &Snapshot, out: &mut impl Write) -> Result<()> {
    if let Some(entry) = snapshot.entries().last() {
        writeln!(out, "Learned new FAQ ✅\nQ: {}\nA: {}", entry.question, entry.answer)?;
    }
    Ok(())
}

fn print_listing(faqs: &[Listing], out: &mut impl Write) -> Result<()> {
    if faqs.is_empty() {
        writeln!(out, "No FAQs available.")?;
        return Ok(());
    }
    for f in faqs {
        writeln!(out, "{}. Q: {}\n   A: {}\n", f.position, f.question, f.answer)?;
    }
    Ok(())
}

fn chat(engine: &Engine, store: &FaqStore, diagnostics: bool, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Bot: {WELCOME}\n")?;
    let mut lines = input.lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let text = line.trim();
        match text {
            "" => continue,
            "/quit" => break,
            "/list" => print_listing(&engine.entries(), out)?,
            "/teach" => {
                let mut prompt = |label: &str| -> Result<String> {
                    write!(out, "{label}: ")?;
                    out.flush()?;
                    Ok(lines.next().transpose()?.unwrap_or_default())
                };
                let question = prompt("Question")?;
                let answer = prompt("Answer")?;
                match engine.add_entry(&question, &answer) {
                    Ok(snapshot) => {
                        if let Err(e) = store.save(snapshot.entries()) {
                            tracing::warn!(error = %e, path = %store.path().display(), "failed to persist faqs");
                        }
                        print_learned(&snapshot, out)?;
                        writeln!(out)?;
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "teach rejected");
                        writeln!(out, "Bot: Both question and answer are required.\n")?;
                    }
                }
            }
            _ => {
                let reply = engine.reply(text, diagnostics);
                if reply.clears_transcript() {
                    // ANSI: clear screen, cursor home
                    write!(out, "\x1b[2J\x1b[H")?;
                }
                writeln!(out, "Bot: {}\n", reply.text)?;
            }
        }
    }
    Ok(())
}
