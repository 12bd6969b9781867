//! Retrieve node: fetches grounding passages for the search query, once per turn.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::retriever::{format_grounding, Retriever};
use crate::state::WorkflowState;

use super::RETRIEVE;

/// Sets `grounding_text` and `sources` from the top `k` passages.
pub struct RetrieveNode {
    retriever: Arc<dyn Retriever>,
    k: usize,
}

impl RetrieveNode {
    pub fn new(retriever: Arc<dyn Retriever>, k: usize) -> Self {
        Self { retriever, k }
    }
}

#[async_trait]
impl Node<WorkflowState> for RetrieveNode {
    fn id(&self) -> &str {
        RETRIEVE
    }

    async fn run(&self, state: WorkflowState) -> Result<(WorkflowState, Next), AgentError> {
        let mut passages = self.retriever.retrieve(&state.search_query, self.k).await?;
        passages.truncate(self.k);
        tracing::info!(query = %state.search_query, passages = passages.len(), "retrieved");

        let sources = passages
            .iter()
            .map(|p| p.display_title().to_string())
            .collect();
        Ok((
            WorkflowState {
                grounding_text: format_grounding(&passages),
                sources,
                ..state
            },
            Next::Continue,
        ))
    }
}
