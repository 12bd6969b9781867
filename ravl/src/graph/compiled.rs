//! The frozen, runnable form of a [`StateGraph`](super::StateGraph).

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::task::AbortOnDropHandle;
use tracing::Instrument;

use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_transition,
};
use super::node_middleware::NodeMiddleware;
use super::run_context::RunContext;
use super::state_graph::END;
use super::{Next, Node, Successor};

/// Buffered events per streaming run before the runner waits on the consumer.
const EVENT_BUFFER: usize = 128;

/// Handle to a run started by [`CompiledStateGraph::stream`].
///
/// `events` closes when the run stops. The outcome, including any error, is only
/// available through `result`. Dropping `result` aborts the run at its next await,
/// so a caller that gives up on a turn stops its pending model calls too.
pub struct StreamRun<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub events: ReceiverStream<StreamEvent<S>>,
    pub result: AbortOnDropHandle<Result<S, AgentError>>,
}

/// Runnable graph. Cheap to clone; clones share the nodes.
///
/// Each node's output replaces the state wholesale, and the run stops at the first
/// node error.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) entry: String,
    pub(super) successors: HashMap<String, Successor<S>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Runs to completion and returns the final state.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        self.drive(state, &RunContext::silent()).await
    }

    /// Starts a run on the tokio runtime and reports progress for `modes`.
    ///
    /// The task inherits the caller's span. Dropping `events` does not stop it;
    /// dropping the returned [`StreamRun::result`] does.
    pub fn stream(&self, state: S, modes: impl Into<HashSet<StreamMode>>) -> StreamRun<S> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let ctx = RunContext::streaming(tx, modes.into());
        let graph = self.clone();
        let task = tokio::spawn(async move { graph.drive(state, &ctx).await }.in_current_span());
        StreamRun {
            events: ReceiverStream::new(rx),
            result: AbortOnDropHandle::new(task),
        }
    }

    async fn drive(&self, mut state: S, ctx: &RunContext<S>) -> Result<S, AgentError> {
        if !self.nodes.contains_key(&self.entry) {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        log_graph_start();
        let mut current = self.entry.clone();
        loop {
            let (next_state, hint) = match self.step(&current, state, ctx).await {
                Ok(out) => out,
                Err(e) => {
                    log_graph_error(&e);
                    return Err(e);
                }
            };
            state = next_state;
            match self.next_hop(&current, &state, hint) {
                Some(to) => {
                    log_transition(&current, Some(&to));
                    current = to;
                }
                None => {
                    log_transition(&current, None);
                    log_graph_complete();
                    return Ok(state);
                }
            }
        }
    }

    /// Runs one node and emits its events.
    async fn step(&self, id: &str, state: S, ctx: &RunContext<S>) -> Result<(S, Next), AgentError> {
        let node = self
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| AgentError::ExecutionFailed(format!("unknown node: {}", id)))?;

        log_node_start(id);
        log_node_state(id, &state);
        ctx.emit(StreamMode::Tasks, || StreamEvent::TaskStart {
            node_id: id.to_string(),
        })
        .await;

        let outcome = match &self.middleware {
            Some(middleware) => {
                middleware
                    .around_run(
                        id,
                        state,
                        Box::new(move |s| Box::pin(async move { node.run(s).await })),
                    )
                    .await
            }
            None => node.run(state).await,
        };

        ctx.emit(StreamMode::Tasks, || StreamEvent::TaskEnd {
            node_id: id.to_string(),
            result: outcome.as_ref().map(|_| ()).map_err(|e| e.to_string()),
        })
        .await;
        let (state, hint) = outcome?;
        log_node_complete(id, &hint);

        ctx.emit(StreamMode::Values, || StreamEvent::Values(state.clone()))
            .await;
        ctx.emit(StreamMode::Updates, || StreamEvent::Updates {
            node_id: id.to_string(),
            state: state.clone(),
        })
        .await;
        Ok((state, hint))
    }

    /// Node to run after `id`, or `None` when the run is over.
    fn next_hop(&self, id: &str, state: &S, hint: Next) -> Option<String> {
        let to = match (self.successors.get(id), hint) {
            (Some(Successor::Routed(router)), _) => router.target(state),
            (_, Next::End) => return None,
            (_, Next::Node(to)) => to,
            (Some(Successor::Edge(to)), Next::Continue) => to.clone(),
            (None, Next::Continue) => return None,
        };
        (to != END).then_some(to)
    }
}
