//! Draft node: writes the first answer from the grounding text.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{LlmClient, ResponseFormat};
use crate::prompts::{draft_user, DRAFT_SYSTEM_PROMPT, NOT_SPECIFIED_ANSWER};
use crate::state::WorkflowState;

use super::DRAFT;

/// Sets `draft_answer`. With empty grounding the answer is the canonical
/// "not specified" statement and no completion is made.
pub struct DraftNode {
    llm: Arc<dyn LlmClient>,
    max_history: usize,
}

impl DraftNode {
    pub fn new(llm: Arc<dyn LlmClient>, max_history: usize) -> Self {
        Self { llm, max_history }
    }
}

#[async_trait]
impl Node<WorkflowState> for DraftNode {
    fn id(&self) -> &str {
        DRAFT
    }

    async fn run(&self, state: WorkflowState) -> Result<(WorkflowState, Next), AgentError> {
        let draft_answer = if state.grounding_text.trim().is_empty() {
            tracing::info!("no grounding, answering as not specified");
            NOT_SPECIFIED_ANSWER.to_string()
        } else {
            let recent = context::window(&state.history, self.max_history);
            self.llm
                .complete(
                    DRAFT_SYSTEM_PROMPT,
                    &draft_user(&state.search_query, &state.grounding_text, recent),
                    ResponseFormat::Text,
                )
                .await?
        };
        tracing::debug!(chars = draft_answer.chars().count(), "draft written");

        Ok((
            WorkflowState {
                draft_answer,
                ..state
            },
            Next::Continue,
        ))
    }
}
