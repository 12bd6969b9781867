//! Structured `tracing` events emitted by the graph runner.
//!
//! Run-level events are `info`, per-node events `debug`. Full node input states go
//! out at `trace` only, since a state carries the whole grounding text.

use std::fmt::Debug;

use crate::error::AgentError;
use crate::graph::Next;

pub(crate) fn log_graph_start() {
    tracing::info!("graph run started");
}

pub(crate) fn log_graph_complete() {
    tracing::info!("graph run finished");
}

pub(crate) fn log_graph_error(error: &AgentError) {
    tracing::error!(error = %error, transient = error.is_transient(), "graph run failed");
}

pub(crate) fn log_node_start(node_id: &str) {
    tracing::debug!(node = node_id, "node entered");
}

pub(crate) fn log_node_state<S: Debug>(node_id: &str, state: &S) {
    tracing::trace!(node = node_id, state = ?state, "node input");
}

pub(crate) fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node = node_id, ?next, "node exited");
}

/// Logs the edge taken out of `from`; `to` is `None` when the run ends.
pub(crate) fn log_transition(from: &str, to: Option<&str>) {
    tracing::debug!(from, to = to.unwrap_or("END"), "transition");
}
