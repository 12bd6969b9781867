//! Hook that runs around every node of a compiled graph.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::AgentError;

use super::Next;

/// Boxed future of one node step.
pub type NodeStep<S> = Pin<Box<dyn Future<Output = Result<(S, Next), AgentError>> + Send>>;

/// The node step, not yet started. Calling it with the state starts the node.
pub type NodeRunFn<S> = Box<dyn FnOnce(S) -> NodeStep<S> + Send>;

/// Wraps node execution. Installed with [`StateGraph::with_middleware`](super::StateGraph::with_middleware).
///
/// An implementation must call `inner` at most once. Not calling it skips the node,
/// and whatever the middleware returns is taken as the node's result.
#[async_trait]
pub trait NodeMiddleware<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S>,
    ) -> Result<(S, Next), AgentError>;
}
