//! Validation-loop runner: builds the graph once, answers one question per call.
//!
//! Graph: START → rewrite_query → retrieve → draft → critique → [route_after_critique]
//! → revise | END, revise → critique. Every node runs under `CallTimeoutMiddleware`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tokio_stream::StreamExt;
use tracing::Instrument;

use crate::config::RavlConfig;
use crate::error::AgentError;
use crate::graph::{
    CallTimeoutMiddleware, CompilationError, CompiledStateGraph, StateGraph, END, START,
};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::nodes::{
    CritiqueNode, DraftNode, RetrieveNode, ReviseNode, RewriteQueryNode, CRITIQUE, DRAFT,
    RETRIEVE, REVISE, REWRITE_QUERY,
};
use crate::retriever::Retriever;
use crate::routing::{route_after_critique, Transition};
use crate::state::{Grade, WorkflowState};
use crate::stream::{StreamEvent, StreamMode};

/// Error type for `RavlRunner` operations.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
}

impl RunError {
    /// True when retrying the whole turn may succeed (capability failure or timeout).
    pub fn is_transient(&self) -> bool {
        match self {
            RunError::Execution(e) => e.is_transient(),
            RunError::Compilation(_) => false,
        }
    }
}

/// Result of one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub final_answer: String,
    pub revision_count: u32,
    /// `Pass` when the critic accepted the answer; `Fail` when the revision cap was hit.
    pub grade: Grade,
    pub search_query: String,
    pub sources: Vec<String>,
}

impl AnswerOutcome {
    /// False when the answer is returned without passing the critic.
    pub fn is_validated(&self) -> bool {
        self.grade == Grade::Pass
    }
}

impl From<WorkflowState> for AnswerOutcome {
    fn from(state: WorkflowState) -> Self {
        Self {
            final_answer: state.draft_answer,
            revision_count: state.revision_count,
            grade: state.grade,
            search_query: state.search_query,
            sources: state.sources,
        }
    }
}

/// Builds the validation-loop graph over the given capabilities.
pub fn build_graph(
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    config: &RavlConfig,
) -> Result<CompiledStateGraph<WorkflowState>, CompilationError> {
    let max_revisions = config.max_revisions;
    let critique_targets: HashMap<String, String> = [
        (Transition::End.as_key().into(), END.into()),
        (Transition::Exhausted.as_key().into(), END.into()),
        (Transition::Revise.as_key().into(), REVISE.into()),
    ]
    .into_iter()
    .collect();

    let mut graph = StateGraph::<WorkflowState>::new();
    graph
        .add_node(
            REWRITE_QUERY,
            Arc::new(RewriteQueryNode::new(Arc::clone(&llm), config.max_chat_history)),
        )
        .add_node(RETRIEVE, Arc::new(RetrieveNode::new(retriever, config.retriever_k)))
        .add_node(
            DRAFT,
            Arc::new(DraftNode::new(Arc::clone(&llm), config.max_chat_history)),
        )
        .add_node(CRITIQUE, Arc::new(CritiqueNode::new(Arc::clone(&llm))))
        .add_node(REVISE, Arc::new(ReviseNode::new(llm)))
        .add_edge(START, REWRITE_QUERY)
        .add_edge(REWRITE_QUERY, RETRIEVE)
        .add_edge(RETRIEVE, DRAFT)
        .add_edge(DRAFT, CRITIQUE)
        .add_conditional_edges(
            CRITIQUE,
            Arc::new(move |state: &WorkflowState| {
                route_after_critique(state.grade, state.revision_count, max_revisions)
                    .as_key()
                    .to_string()
            }),
            Some(critique_targets),
        )
        .add_edge(REVISE, CRITIQUE);

    graph
        .with_middleware(Arc::new(CallTimeoutMiddleware::new(config.call_timeout)))
        .compile()
}

/// Validation-loop runner.
///
/// Holds the compiled graph and read-only config; `answer` and `stream_answer` take
/// `&self`, so one runner can serve concurrent turns.
pub struct RavlRunner {
    compiled: CompiledStateGraph<WorkflowState>,
    config: RavlConfig,
}

impl RavlRunner {
    /// Creates a runner with the given LLM, retriever and config.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn Retriever>,
        config: RavlConfig,
    ) -> Result<Self, RunError> {
        let compiled = build_graph(llm, retriever, &config)?;
        Ok(Self { compiled, config })
    }

    pub fn config(&self) -> &RavlConfig {
        &self.config
    }

    /// Answers `question` given a snapshot of the conversation so far.
    ///
    /// The caller's history is not modified; appending the new exchange is up to the caller.
    pub async fn answer(
        &self,
        question: &str,
        history: &[Message],
    ) -> Result<AnswerOutcome, RunError> {
        let span = turn_span();
        async {
            tracing::info!(question = %question, history = history.len(), "turn started");
            let state = WorkflowState::new(question, history.to_vec());
            let final_state = self.compiled.invoke(state).await?;
            Ok::<_, RunError>(self.finish(final_state))
        }
        .instrument(span)
        .await
    }

    /// Like [`answer`](Self::answer), but reports each stage as it runs.
    ///
    /// `on_event` receives `TaskStart`/`TaskEnd` and `Updates` events in order. A failing
    /// stage is reported as `TaskEnd` with an error and the call returns that error.
    /// Dropping the returned future cancels the turn, including any stage in flight.
    pub async fn stream_answer<F>(
        &self,
        question: &str,
        history: &[Message],
        mut on_event: F,
    ) -> Result<AnswerOutcome, RunError>
    where
        F: FnMut(StreamEvent<WorkflowState>),
    {
        let span = turn_span();
        async {
            tracing::info!(question = %question, history = history.len(), "turn started");
            let state = WorkflowState::new(question, history.to_vec());
            let modes = HashSet::from([StreamMode::Tasks, StreamMode::Updates]);
            let mut run = self.compiled.stream(state, modes);
            while let Some(event) = run.events.next().await {
                on_event(event);
            }
            let final_state = run
                .result
                .await
                .map_err(|e| AgentError::ExecutionFailed(format!("graph task failed: {}", e)))??;
            Ok::<_, RunError>(self.finish(final_state))
        }
        .instrument(span)
        .await
    }

    fn finish(&self, state: WorkflowState) -> AnswerOutcome {
        if state.grade == Grade::Pass {
            tracing::info!(
                revision_count = state.revision_count,
                critique_count = state.critique_count,
                "turn complete, answer validated"
            );
        } else {
            tracing::warn!(
                revision_count = state.revision_count,
                max_revisions = self.config.max_revisions,
                "revision cap reached, returning unvalidated answer"
            );
        }
        AnswerOutcome::from(state)
    }
}

fn turn_span() -> tracing::Span {
    tracing::info_span!("ravl_turn", turn_id = %uuid::Uuid::new_v4())
}
