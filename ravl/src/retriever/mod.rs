//! Retrieval capability: query in, ordered grounding passages out.
//!
//! The workflow calls `Retriever::retrieve` exactly once per turn and renders the
//! result with [`format_grounding`]. Implementations: [`StaticRetriever`] (fixed
//! passages, for tests and demos) and [`VectorRetriever`] (embedding search over an
//! in-memory [`Corpus`]).

mod embedder;
mod static_retriever;
mod vector;

pub use embedder::{Embedder, OpenAIEmbedder};
pub use static_retriever::StaticRetriever;
pub use vector::{Corpus, CorpusError, VectorRetriever};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Delimiter placed between passages in the grounding text.
pub const PASSAGE_DELIMITER: &str = "\n\n---\n\n";

/// Title used for a passage whose source carries none.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One retrieved unit of the regulation corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Article title (e.g. `"제10조 (연차휴가)"`). Ingested chunks may store it as `article_title`.
    #[serde(default, alias = "article_title")]
    pub title: Option<String>,
    #[serde(alias = "page_content")]
    pub text: String,
}

impl Passage {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            text: text.into(),
        }
    }

    /// Passage without a title; rendered as `Unknown`.
    pub fn untitled(text: impl Into<String>) -> Self {
        Self {
            title: None,
            text: text.into(),
        }
    }

    /// Title used for display and citation.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => UNKNOWN_TITLE,
        }
    }
}

/// Renders passages as the grounding text: `[문서 i] title\ntext`, joined by [`PASSAGE_DELIMITER`].
///
/// Numbering starts at 1 and follows retrieval order. No passages yields an empty string.
pub fn format_grounding(passages: &[Passage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[문서 {}] {}\n{}", i + 1, p.display_title(), p.text))
        .collect::<Vec<_>>()
        .join(PASSAGE_DELIMITER)
}

/// Retrieval capability: returns at most `k` passages for `query`, best first.
///
/// An empty result is valid. Failures (index unreachable, embedding call failed) are
/// returned as `AgentError::Capability` and abort the turn.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>, AgentError>;
}
