//! The unit of work in a [`StateGraph`](super::StateGraph).

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::AgentError;

use super::Next;

/// A stage that takes the workflow state by value and hands back the updated state
/// together with a routing hint.
///
/// Stages that sit in front of a conditional edge can return anything as the hint;
/// the router overrides it. Implementations are shared across concurrent runs, so they
/// keep no per-run data of their own.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Stable id used for edges, stream events and the `ravl_node` span.
    fn id(&self) -> &str;

    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;
}
