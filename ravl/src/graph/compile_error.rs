use thiserror::Error;

/// Wiring mistakes found by [`StateGraph::compile`](super::StateGraph::compile).
#[derive(Debug, Error)]
pub enum CompilationError {
    #[error("edge refers to unregistered node `{0}`")]
    UnknownNode(String),

    #[error("no edge leaves START, so the graph has no entry node")]
    NoEntry,

    #[error("no edge or route reaches END, so the graph cannot finish")]
    NoExit,

    /// Two plain edges leave the same node (START included).
    #[error("node `{0}` has more than one outgoing edge")]
    Branching(String),

    #[error("node `{0}` has both a plain edge and a conditional router")]
    EdgeAndRouter(String),

    #[error("router maps to unregistered node `{0}`")]
    UnknownRouteTarget(String),

    /// Plain edges alone lead back to `{0}`; a loop needs a router to leave it.
    #[error("plain edges form a cycle through `{0}`")]
    UnconditionalCycle(String),
}
