//! Critique node: grades the current draft against the grounding text.
//!
//! The critic answers in JSON mode with exactly `{"grade", "critique"}`. Anything
//! else is a hard error for the turn; it is never coerced into a grade.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{LlmClient, ResponseFormat};
use crate::prompts::{critique_user, CRITIQUE_SYSTEM_PROMPT};
use crate::state::{Grade, WorkflowState};

use super::CRITIQUE;

/// Decoded critic output. `grade` is `Pass` or `Fail`, never `Unset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CritiqueVerdict {
    pub grade: Grade,
    pub critique: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVerdict {
    grade: String,
    critique: String,
}

/// Strips an optional Markdown code fence (```json … ```) around the payload.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Decodes the critic payload. Grade matching ignores case and surrounding spaces.
pub fn parse_verdict(raw: &str) -> Result<CritiqueVerdict, AgentError> {
    let payload = strip_code_fence(raw);
    let verdict: RawVerdict = serde_json::from_str(payload)
        .map_err(|e| AgentError::MalformedCritique(format!("{}: {}", e, payload)))?;
    let grade = match verdict.grade.trim().to_ascii_uppercase().as_str() {
        "PASS" => Grade::Pass,
        "FAIL" => Grade::Fail,
        other => {
            return Err(AgentError::MalformedCritique(format!(
                "unknown grade {:?}",
                other
            )))
        }
    };
    Ok(CritiqueVerdict {
        grade,
        critique: verdict.critique,
    })
}

/// Sets `grade` and `critique_feedback`; increments `critique_count`.
///
/// Reads only `search_query`, `draft_answer` and `grounding_text`.
pub struct CritiqueNode {
    llm: Arc<dyn LlmClient>,
}

impl CritiqueNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<WorkflowState> for CritiqueNode {
    fn id(&self) -> &str {
        CRITIQUE
    }

    async fn run(&self, state: WorkflowState) -> Result<(WorkflowState, Next), AgentError> {
        let raw = self
            .llm
            .complete(
                CRITIQUE_SYSTEM_PROMPT,
                &critique_user(&state.search_query, &state.draft_answer, &state.grounding_text),
                ResponseFormat::Json,
            )
            .await?;
        let verdict = parse_verdict(&raw)?;
        let critique_count = state.critique_count + 1;
        tracing::info!(
            grade = ?verdict.grade,
            critique_count,
            revision_count = state.revision_count,
            "draft graded"
        );
        if verdict.grade == Grade::Fail {
            tracing::debug!(critique = %verdict.critique, "critique feedback");
        }

        Ok((
            WorkflowState {
                grade: verdict.grade,
                critique_feedback: verdict.critique,
                critique_count,
                ..state
            },
            Next::Continue,
        ))
    }
}
