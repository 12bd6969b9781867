//! Builder for a [`CompiledStateGraph`].
//!
//! Nodes are registered by id and wired with plain edges (`add_edge`) or one router
//! per node (`add_conditional_edges`). `START` and `END` mark entry and exit. Loops
//! are allowed only through a router, so every cycle has a state-driven way out.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use super::compile_error::CompilationError;
use super::compiled::CompiledStateGraph;
use super::conditional::{ConditionalRouter, RouteFn, Successor};
use super::node::Node;
use super::node_middleware::NodeMiddleware;

/// Pseudo-node the first edge leaves from.
pub const START: &str = "__start__";

/// Pseudo-node that finishes the run.
pub const END: &str = "__end__";

/// Mutable graph under construction. Call [`compile`](Self::compile) when wired.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, String)>,
    routers: HashMap<String, ConditionalRouter<S>>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            routers: HashMap::new(),
            middleware: None,
        }
    }

    /// Wraps every node run of the compiled graph in `middleware`.
    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    /// Registers `node` under `id`. A second registration with the same id wins.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Plain edge. `from` may be `START`, `to` may be `END`.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Routes out of `source` by calling `route` on the state `source` returned.
    ///
    /// The key is translated through `targets` when given (see [`ConditionalRouter`]).
    ///
    /// ```rust,ignore
    /// graph.add_conditional_edges(
    ///     "critique",
    ///     Arc::new(|s: &WorkflowState| s.grade.as_str().to_string()),
    ///     Some([("FAIL".into(), "revise".into()), ("PASS".into(), END.into())].into()),
    /// );
    /// ```
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        route: RouteFn<S>,
        targets: Option<HashMap<String, String>>,
    ) -> &mut Self {
        self.routers
            .insert(source.into(), ConditionalRouter::new(route, targets));
        self
    }

    /// Checks the wiring and freezes the graph.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.check_references()?;
        let entry = self.entry()?;
        if !self.reaches_end() {
            return Err(CompilationError::NoExit);
        }
        let plain = self.plain_successors()?;
        reject_plain_cycles(&plain)?;

        let mut successors: HashMap<String, Successor<S>> = plain
            .into_iter()
            .map(|(from, to)| (from, Successor::Edge(to)))
            .collect();
        successors.extend(
            self.routers
                .into_iter()
                .map(|(source, router)| (source, Successor::Routed(router))),
        );

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            entry,
            successors,
            middleware: self.middleware,
        })
    }

    fn is_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    fn check_references(&self) -> Result<(), CompilationError> {
        for (from, to) in &self.edges {
            for (id, sentinel) in [(from, START), (to, END)] {
                if id != sentinel && !self.is_node(id) {
                    return Err(CompilationError::UnknownNode(id.clone()));
                }
            }
        }
        for (source, router) in &self.routers {
            if !self.is_node(source) {
                return Err(CompilationError::UnknownNode(source.clone()));
            }
            if let Some(bad) = router
                .known_targets()
                .and_then(|mut t| t.find(|id| *id != END && !self.is_node(id)))
            {
                return Err(CompilationError::UnknownRouteTarget(bad.clone()));
            }
        }
        Ok(())
    }

    fn entry(&self) -> Result<String, CompilationError> {
        let mut from_start = self.edges.iter().filter(|(from, _)| from == START);
        match (from_start.next(), from_start.next()) {
            (Some((_, first)), None) => Ok(first.clone()),
            (None, _) => Err(CompilationError::NoEntry),
            (Some(_), Some(_)) => Err(CompilationError::Branching(START.to_string())),
        }
    }

    fn reaches_end(&self) -> bool {
        self.edges.iter().any(|(_, to)| to == END)
            || self.routers.values().any(|router| match router.known_targets() {
                Some(mut targets) => targets.any(|id| id == END),
                None => true,
            })
    }

    /// One plain successor per node, excluding `START`.
    fn plain_successors(&self) -> Result<HashMap<String, String>, CompilationError> {
        let mut plain = HashMap::new();
        for (from, to) in self.edges.iter().filter(|(from, _)| from != START) {
            if self.routers.contains_key(from) {
                return Err(CompilationError::EdgeAndRouter(from.clone()));
            }
            if plain.insert(from.clone(), to.clone()).is_some() {
                return Err(CompilationError::Branching(from.clone()));
            }
        }
        Ok(plain)
    }
}

fn reject_plain_cycles(plain: &HashMap<String, String>) -> Result<(), CompilationError> {
    for origin in plain.keys() {
        let mut seen: HashSet<&str> = HashSet::from([origin.as_str()]);
        let mut at = origin.as_str();
        while let Some(next) = plain.get(at).filter(|id| *id != END) {
            if !seen.insert(next.as_str()) {
                return Err(CompilationError::UnconditionalCycle(next.clone()));
            }
            at = next.as_str();
        }
    }
    Ok(())
}
