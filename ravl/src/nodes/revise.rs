//! Revise node: rewrites a failing draft using the critique and the same grounding.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{LlmClient, ResponseFormat};
use crate::prompts::{revise_user, REVISE_SYSTEM_PROMPT};
use crate::state::WorkflowState;

use super::REVISE;

/// Replaces `draft_answer` and increments `revision_count`.
///
/// Leaves `grounding_text` and `search_query` untouched.
pub struct ReviseNode {
    llm: Arc<dyn LlmClient>,
}

impl ReviseNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<WorkflowState> for ReviseNode {
    fn id(&self) -> &str {
        REVISE
    }

    async fn run(&self, state: WorkflowState) -> Result<(WorkflowState, Next), AgentError> {
        let revision_count = state.revision_count + 1;
        tracing::info!(revision = revision_count, "revising draft");
        let draft_answer = self
            .llm
            .complete(
                REVISE_SYSTEM_PROMPT,
                &revise_user(
                    &state.search_query,
                    &state.draft_answer,
                    &state.critique_feedback,
                    &state.grounding_text,
                ),
                ResponseFormat::Text,
            )
            .await?;

        Ok((
            WorkflowState {
                draft_answer,
                revision_count,
                ..state
            },
            Next::Continue,
        ))
    }
}
