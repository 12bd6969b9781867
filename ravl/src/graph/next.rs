/// Routing hint a [`Node`](super::Node) returns with its state.
///
/// Only honoured for nodes with a plain edge. When a node has a conditional router
/// the hint is discarded.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    /// Take the node's edge. A node without one ends the run.
    Continue,
    /// Go straight to the named node, skipping the edge.
    Node(String),
    /// Finish with the state as it is now.
    End,
}
