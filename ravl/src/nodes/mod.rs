//! Workflow stages as graph nodes.
//!
//! Graph: START → rewrite_query → retrieve → draft → critique → [route_after_critique]
//! → revise | END, revise → critique.

mod critique;
mod draft;
mod retrieve;
mod revise;
mod rewrite_query;

pub use critique::{parse_verdict, CritiqueNode, CritiqueVerdict};
pub use draft::DraftNode;
pub use retrieve::RetrieveNode;
pub use revise::ReviseNode;
pub use rewrite_query::RewriteQueryNode;

pub const REWRITE_QUERY: &str = "rewrite_query";
pub const RETRIEVE: &str = "retrieve";
pub const DRAFT: &str = "draft";
pub const CRITIQUE: &str = "critique";
pub const REVISE: &str = "revise";
