//! Library side of the `ravl` binary: building the runner from settings, loading a
//! history file, and rendering outcomes and stage progress.
//!
//! Kept out of `main.rs` so the pieces can be tested without a terminal or network.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ravl::nodes::{CRITIQUE, DRAFT, RETRIEVE, REVISE, REWRITE_QUERY};
use ravl::{
    AnswerOutcome, ChatOpenAI, Corpus, CorpusError, Message, OpenAIEmbedder, RavlConfig,
    RavlRunner, StreamEvent, VectorRetriever, WorkflowState,
};

/// Appended to answers the critic never accepted.
pub const LOW_CONFIDENCE_NOTICE: &str =
    "⚠️ 이 답변은 규정 검증을 통과하지 못했습니다. 최종 결정은 인사팀과 상의하세요.";

/// Environment variable consulted when `--corpus` is not given.
pub const CORPUS_ENV: &str = "RAVL_CORPUS";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] ravl::ConfigError),
    #[error("no corpus: pass --corpus FILE or set RAVL_CORPUS")]
    MissingCorpus,
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    #[error("embedding corpus: {0}")]
    Index(#[source] ravl::AgentError),
    #[error("read history {path}: {source}")]
    HistoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse history {path}: {source}")]
    HistoryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Run(#[from] ravl::RunError),
}

/// Loads `[{"role": "user" | "assistant", "content": "..."}]` from `path`.
pub fn load_history(path: &Path) -> Result<Vec<Message>, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::HistoryRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::HistoryParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Picks the corpus file: the explicit argument, else `RAVL_CORPUS`.
pub fn resolve_corpus_path(arg: Option<PathBuf>) -> Result<PathBuf, CliError> {
    arg.or_else(|| std::env::var_os(CORPUS_ENV).map(PathBuf::from))
        .ok_or(CliError::MissingCorpus)
}

/// Builds a runner over OpenAI chat completion and an embedded in-memory corpus.
///
/// Embeds the whole corpus up front, so this makes network calls.
pub async fn build_openai_runner(
    config: RavlConfig,
    corpus_path: &Path,
) -> Result<RavlRunner, CliError> {
    let corpus = Corpus::from_json_file(corpus_path)?;
    tracing::info!(
        path = %corpus_path.display(),
        passages = corpus.len(),
        model = %config.embedding_model,
        "indexing corpus"
    );
    let embedder = Arc::new(OpenAIEmbedder::new(config.embedding_model.clone()));
    let retriever = VectorRetriever::build(embedder, corpus)
        .await
        .map_err(CliError::Index)?;
    let llm = Arc::new(ChatOpenAI::new(config.chat_model.clone()));
    Ok(RavlRunner::new(llm, Arc::new(retriever), config)?)
}

/// Text shown for an outcome: the answer, plus the notice when it was not validated.
pub fn render_answer(outcome: &AnswerOutcome) -> String {
    if outcome.is_validated() {
        outcome.final_answer.clone()
    } else {
        format!("{}\n\n{}", outcome.final_answer, LOW_CONFIDENCE_NOTICE)
    }
}

/// One stderr line per finished stage for `--verbose`; `None` for events not worth a line.
pub fn stage_line(event: &StreamEvent<WorkflowState>) -> Option<String> {
    match event {
        StreamEvent::TaskStart { .. } | StreamEvent::Values(_) => None,
        StreamEvent::TaskEnd {
            node_id,
            result: Err(e),
        } => Some(format!("[{}] failed: {}", node_id, e)),
        StreamEvent::TaskEnd { .. } => None,
        StreamEvent::Updates { node_id, state } => Some(match node_id.as_str() {
            REWRITE_QUERY => format!("[rewrite_query] {}", state.search_query),
            RETRIEVE => format!(
                "[retrieve] {} passage(s): {}",
                state.sources.len(),
                state.sources.join(", ")
            ),
            DRAFT => format!("[draft] {} chars", state.draft_answer.chars().count()),
            CRITIQUE => format!(
                "[critique #{}] {:?}: {}",
                state.critique_count, state.grade, state.critique_feedback
            ),
            REVISE => format!("[revise] revision {}", state.revision_count),
            other => format!("[{}] done", other),
        }),
    }
}

/// A conversation held in memory: each answered turn is appended to the history the
/// next turn sees. Failed turns leave the history unchanged.
pub struct Session {
    runner: RavlRunner,
    history: Vec<Message>,
}

impl Session {
    pub fn new(runner: RavlRunner, history: Vec<Message>) -> Self {
        Self { runner, history }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Answers `question` in the context of the session so far.
    pub async fn ask(&mut self, question: &str) -> Result<AnswerOutcome, CliError> {
        let outcome = self.runner.answer(question, &self.history).await?;
        self.record(question, &outcome);
        Ok(outcome)
    }

    /// Like [`ask`](Self::ask), passing one progress line per stage to `on_line`.
    pub async fn ask_with_progress<F>(
        &mut self,
        question: &str,
        mut on_line: F,
    ) -> Result<AnswerOutcome, CliError>
    where
        F: FnMut(String),
    {
        let outcome = self
            .runner
            .stream_answer(question, &self.history, |event| {
                if let Some(line) = stage_line(&event) {
                    on_line(line);
                }
            })
            .await?;
        self.record(question, &outcome);
        Ok(outcome)
    }

    fn record(&mut self, question: &str, outcome: &AnswerOutcome) {
        self.history.push(Message::user(question));
        self.history
            .push(Message::assistant(outcome.final_answer.clone()));
    }
}
