//! Rewrite-query node: turns a follow-up question into a standalone search query.
//!
//! Without history the question is already standalone and no completion is made.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{LlmClient, ResponseFormat};
use crate::prompts::{rewrite_user, REWRITE_SYSTEM_PROMPT};
use crate::state::WorkflowState;

use super::REWRITE_QUERY;

/// Sets `search_query` from the question and the windowed history.
pub struct RewriteQueryNode {
    llm: Arc<dyn LlmClient>,
    max_history: usize,
}

impl RewriteQueryNode {
    pub fn new(llm: Arc<dyn LlmClient>, max_history: usize) -> Self {
        Self { llm, max_history }
    }
}

#[async_trait]
impl Node<WorkflowState> for RewriteQueryNode {
    fn id(&self) -> &str {
        REWRITE_QUERY
    }

    async fn run(&self, state: WorkflowState) -> Result<(WorkflowState, Next), AgentError> {
        let recent = context::window(&state.history, self.max_history);
        if recent.is_empty() {
            tracing::debug!("no history, searching with the question as asked");
            let search_query = state.original_question.clone();
            return Ok((
                WorkflowState {
                    search_query,
                    ..state
                },
                Next::Continue,
            ));
        }

        let raw = self
            .llm
            .complete(
                REWRITE_SYSTEM_PROMPT,
                &rewrite_user(&state.original_question, recent),
                ResponseFormat::Text,
            )
            .await?;
        let rewritten = raw.trim();
        let search_query = if rewritten.is_empty() {
            tracing::warn!("empty rewrite, falling back to the original question");
            state.original_question.clone()
        } else {
            rewritten.to_string()
        };
        tracing::info!(
            original = %state.original_question,
            rewritten = %search_query,
            "query rewritten"
        );

        Ok((
            WorkflowState {
                search_query,
                ..state
            },
            Next::Continue,
        ))
    }
}
