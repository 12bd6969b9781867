//! In-memory embedding search over a prebuilt regulation corpus.
//!
//! The corpus is a JSON array of passages produced by the ingestion job. At build
//! time every passage is embedded once; each query is embedded and ranked by cosine
//! similarity. Ties keep corpus order, so results are deterministic for a fixed corpus.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AgentError;

use super::{Embedder, Passage, Retriever};

const EMBED_BATCH: usize = 64;

/// Errors loading a corpus file.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("read corpus {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse corpus {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered list of passages the vector retriever searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub passages: Vec<Passage>,
}

impl Corpus {
    pub fn new(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    /// Loads a JSON array of `{title, text}` (or `{article_title, page_content}`) objects.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: display.clone(),
            source,
        })?;
        let passages: Vec<Passage> =
            serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
                path: display,
                source,
            })?;
        Ok(Self { passages })
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

/// Retriever ranking an embedded corpus by cosine similarity to the query.
///
/// **Interaction**: Implements `Retriever`; the CLI builds one from `--corpus`.
pub struct VectorRetriever {
    embedder: Arc<dyn Embedder>,
    entries: Vec<(Passage, Vec<f32>)>,
}

impl VectorRetriever {
    /// Embeds every passage of `corpus` and returns a ready retriever.
    pub async fn build(embedder: Arc<dyn Embedder>, corpus: Corpus) -> Result<Self, AgentError> {
        let mut entries = Vec::with_capacity(corpus.len());
        for batch in corpus.passages.chunks(EMBED_BATCH) {
            let texts: Vec<&str> = batch.iter().map(|p| p.text.as_str()).collect();
            let vectors = embedder.embed(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(AgentError::retrieval(format!(
                    "embedder returned {} vectors for {} passages",
                    vectors.len(),
                    batch.len()
                )));
            }
            check_width(&vectors, embedder.dimension())?;
            entries.extend(batch.iter().cloned().zip(vectors));
        }
        tracing::info!(passages = entries.len(), "vector index built");
        Ok(Self { embedder, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_width(vectors: &[Vec<f32>], dimension: usize) -> Result<(), AgentError> {
    match vectors.iter().find(|v| v.len() != dimension) {
        Some(v) => Err(AgentError::retrieval(format!(
            "embedder returned a {}-wide vector, expected {}",
            v.len(),
            dimension
        ))),
        None => Ok(()),
    }
}

/// Cosine of the angle between `a` and `b`. Mismatched lengths, empty or all-zero
/// vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>, AgentError> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self
            .embedder
            .embed(&[query])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::retrieval("no embedding returned for query"))?;
        check_width(std::slice::from_ref(&query_vec), self.embedder.dimension())?;

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (_, v))| {
                let score = cosine_similarity(&query_vec, v);
                (i, if score.is_nan() { f32::NEG_INFINITY } else { score })
            })
            .collect();
        // Stable sort: equal scores stay in corpus order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let hits: Vec<Passage> = scored
            .into_iter()
            .take(k)
            .map(|(i, _)| self.entries[i].0.clone())
            .collect();
        tracing::debug!(query = %query, hits = hits.len(), "vector search");
        Ok(hits)
    }
}
