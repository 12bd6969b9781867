//! Generative completion capability used by every LLM-backed workflow stage.
//!
//! A stage sends one system instruction plus one user message and receives the
//! assistant text. The critic asks for `ResponseFormat::Json`; every other stage
//! asks for plain text.

mod mock;
mod openai;

pub use mock::{LlmCall, MockLlm};
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::AgentError;

/// Output mode requested from the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Free-form assistant text.
    #[default]
    Text,
    /// A single JSON object (structured-output mode).
    Json,
}

/// LLM client: given a system instruction and a user message, returns the assistant text.
///
/// Implementations: `MockLlm` (scripted responses), `ChatOpenAI` (real API).
/// Failures of the underlying call are returned as `AgentError::Capability` and are
/// never replaced by default content.
///
/// **Interaction**: Used by the rewrite_query, draft, critique and revise nodes.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One completion call.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String, AgentError>;
}
