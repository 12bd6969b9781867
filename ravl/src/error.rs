//! Node and capability error types.
//!
//! Returned by `Node::run`, `LlmClient::complete` and `Retriever::retrieve`. Every
//! failure of an external call surfaces here and is propagated to the turn boundary
//! unchanged; no node substitutes default content for a failed call.

use std::time::Duration;

use thiserror::Error;

/// Error raised while running one step of the workflow.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed for a reason internal to the graph (e.g. empty graph).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// An external capability (generative completion or retrieval) failed: network,
    /// rate limit, provider error. Not retried by the loop.
    #[error("{capability} call failed: {message}")]
    Capability {
        capability: &'static str,
        message: String,
    },

    /// A workflow stage did not finish within the configured call timeout.
    #[error("stage {stage} timed out after {after:?}")]
    Timeout { stage: String, after: Duration },

    /// The critic returned a payload that does not decode into `grade` + `critique`.
    #[error("malformed critique output: {0}")]
    MalformedCritique(String),
}

impl AgentError {
    /// Builds a generative-completion failure.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Capability {
            capability: "completion",
            message: message.into(),
        }
    }

    /// Builds a retrieval failure.
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Capability {
            capability: "retrieval",
            message: message.into(),
        }
    }

    /// True for failures the caller may retry as a whole turn.
    ///
    /// Malformed critic output is not transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Capability { .. } | Self::Timeout { .. })
    }
}
