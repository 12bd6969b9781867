//! Progress events of a streamed graph run.

use std::fmt::Debug;

/// Event families a caller can subscribe to with
/// [`CompiledStateGraph::stream`](crate::graph::CompiledStateGraph::stream).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// [`StreamEvent::Values`]
    Values,
    /// [`StreamEvent::Updates`]
    Updates,
    /// [`StreamEvent::TaskStart`] and [`StreamEvent::TaskEnd`]
    Tasks,
}

#[derive(Clone, Debug)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// State after a node, without saying which one.
    Values(S),
    /// State after the node `node_id`. The CLI's `--verbose` lines are built from these.
    Updates { node_id: String, state: S },
    TaskStart { node_id: String },
    /// `result` holds the error text when the node failed. No `Updates` or `Values`
    /// follow a failed node.
    TaskEnd {
        node_id: String,
        result: Result<(), String>,
    },
}
