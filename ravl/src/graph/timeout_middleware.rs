//! Middleware that bounds every node run by a caller-supplied timeout.
//!
//! Each workflow stage makes at most one external call, so bounding the node bounds
//! the call. A node that overruns aborts the run with `AgentError::Timeout`; the
//! partial state is dropped, never returned.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use tracing::Instrument;

use crate::error::AgentError;
use crate::graph::Next;

use super::{NodeMiddleware, NodeRunFn};

/// Runs each node inside a `ravl_node` span and fails it after `timeout`.
pub struct CallTimeoutMiddleware<S> {
    timeout: Duration,
    _phantom: PhantomData<fn(S)>,
}

impl<S> CallTimeoutMiddleware<S> {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            _phantom: PhantomData,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<S> NodeMiddleware<S> for CallTimeoutMiddleware<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S>,
    ) -> Result<(S, Next), AgentError> {
        let span = tracing::info_span!("ravl_node", node = node_id);
        match tokio::time::timeout(self.timeout, inner(state).instrument(span)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(node = node_id, timeout = ?self.timeout, "node timed out");
                Err(AgentError::Timeout {
                    stage: node_id.to_string(),
                    after: self.timeout,
                })
            }
        }
    }
}
