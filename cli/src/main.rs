//! ravl CLI binary: ask the regulation assistant a question from the command line.
//!
//! One-shot by default; `-i` keeps a conversation going so follow-up questions work.

mod log_format;
mod logging;
mod repl;

use std::path::PathBuf;

use clap::Parser;
use cli::{build_openai_runner, load_history, render_answer, resolve_corpus_path, CliError, Session};
use ravl::{AnswerOutcome, RavlConfig};

#[derive(Parser, Debug)]
#[command(name = "ravl")]
#[command(about = "Answer HR regulation questions with retrieval and a validation loop")]
struct Args {
    /// Question (or pass as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: question when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Regulation corpus: JSON array of {"title", "text"} (default: $RAVL_CORPUS)
    #[arg(short, long, value_name = "FILE")]
    corpus: Option<PathBuf>,

    /// Prior conversation: JSON array of {"role": "user"|"assistant", "content"}
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Verbose: print each stage (rewrite, retrieve, draft, critique, revise) to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Interactive: after the first answer, keep reading questions from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Print the full outcome (answer, grade, revisions, query, sources) as JSON
    #[arg(long)]
    json: bool,

    /// When using --json, pretty-print (multi-line)
    #[arg(long)]
    pretty: bool,
}

/// How turns are run and printed, shared by one-shot and interactive mode.
pub(crate) struct Output {
    verbose: bool,
    json: bool,
    pretty: bool,
}

impl Output {
    pub(crate) async fn ask(
        &self,
        session: &mut Session,
        question: &str,
    ) -> Result<AnswerOutcome, CliError> {
        if self.verbose {
            session
                .ask_with_progress(question, |line| eprintln!("{}", line))
                .await
        } else {
            session.ask(question).await
        }
    }

    pub(crate) fn print(&self, outcome: &AnswerOutcome) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            let mut value = serde_json::to_value(outcome)?;
            value["validated"] = serde_json::Value::Bool(outcome.is_validated());
            let s = if self.pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{}", s);
        } else {
            println!("{}", render_answer(outcome));
            if self.verbose && !outcome.sources.is_empty() {
                eprintln!("sources: {}", outcome.sources.join(", "));
            }
        }
        std::io::Write::flush(&mut std::io::stdout())?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = config::load_and_apply("ravl", None);
    let log_guard = logging::init()?;
    match &loaded {
        Ok(report) => tracing::debug!(
            dotenv = ?report.dotenv_path,
            xdg = ?report.xdg_path,
            applied = ?report.applied,
            "config loaded"
        ),
        Err(e) => tracing::warn!(error = %e, "config files not applied"),
    }

    let args = Args::parse();
    let question = args.message.clone().or_else(|| {
        if args.rest.is_empty() {
            None
        } else {
            Some(args.rest.join(" "))
        }
    });
    if !args.interactive && question.is_none() {
        eprintln!("ravl: provide a question via -m/--message or positional args");
        std::process::exit(2);
    }

    let settings = RavlConfig::from_env().map_err(CliError::from)?;
    let corpus = resolve_corpus_path(args.corpus.clone())?;
    let history = match &args.history {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };
    let runner = build_openai_runner(settings, &corpus).await?;
    let mut session = Session::new(runner, history);
    let output = Output {
        verbose: args.verbose,
        json: args.json,
        pretty: args.pretty,
    };

    if let Some(question) = question.filter(|q| !q.trim().is_empty()) {
        match output.ask(&mut session, question.trim()).await {
            Ok(outcome) => output.print(&outcome)?,
            Err(e) => {
                eprintln!("error: {}", e);
                if !args.interactive {
                    drop(log_guard);
                    std::process::exit(1);
                }
            }
        }
    }

    if args.interactive {
        repl::run_repl_loop(&mut session, &output).await?;
    }
    Ok(())
}
