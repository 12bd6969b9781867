//! State-driven routing out of a node.

use std::collections::HashMap;
use std::sync::Arc;

/// Picks a route key from the state a node just produced.
pub type RouteFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// A route function plus the table that turns its keys into node ids.
///
/// Without a table the key is the node id. With one, keys missing from the table
/// also pass through as node ids, so a router can name a node directly.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    pub(super) route: RouteFn<S>,
    pub(super) targets: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S> {
    pub fn new(route: RouteFn<S>, targets: Option<HashMap<String, String>>) -> Self {
        Self { route, targets }
    }

    /// Node id (or `END`) the run continues with.
    pub fn target(&self, state: &S) -> String {
        let key = (self.route)(state);
        match self.targets.as_ref().and_then(|t| t.get(&key)) {
            Some(id) => id.clone(),
            None => key,
        }
    }

    /// Every id the table can produce. `None` means any id is possible.
    pub(super) fn known_targets(&self) -> Option<impl Iterator<Item = &String>> {
        self.targets.as_ref().map(|t| t.values())
    }
}

/// What follows a node once it has run.
#[derive(Clone)]
pub enum Successor<S> {
    /// A plain edge. The node's [`Next`](super::Next) hint may still override it.
    Edge(String),
    /// A router; the node's hint is ignored.
    Routed(ConditionalRouter<S>),
}
