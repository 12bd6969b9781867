//! Small async state-machine engine the answer workflow runs on.
//!
//! A [`StateGraph`] collects nodes, plain edges and conditional routers. Compiling it
//! checks the wiring once, and the resulting [`CompiledStateGraph`] can then be run
//! any number of times, concurrently, either to completion or as an event stream.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod next;
mod node;
mod node_middleware;
mod run_context;
mod state_graph;
mod timeout_middleware;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, StreamRun};
pub use conditional::{ConditionalRouter, RouteFn, Successor};
pub use next::Next;
pub use node::Node;
pub use node_middleware::{NodeMiddleware, NodeRunFn, NodeStep};
pub use state_graph::{StateGraph, END, START};
pub use timeout_middleware::CallTimeoutMiddleware;
