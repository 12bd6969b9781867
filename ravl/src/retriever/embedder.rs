//! Text to vector, for [`VectorRetriever`](super::VectorRetriever).

use async_openai::config::OpenAIConfig;
use async_openai::types::embeddings::{CreateEmbeddingRequest, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;

use crate::error::AgentError;

/// Embeds a batch of texts. The result has one vector per text, in the same order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AgentError>;

    fn dimension(&self) -> usize;
}

/// Embedding models with a known output size. Others are assumed to be 1536 wide.
const KNOWN_DIMENSIONS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

/// [`Embedder`] backed by the OpenAI Embeddings API.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl OpenAIEmbedder {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimension = KNOWN_DIMENSIONS
            .iter()
            .find(|(name, _)| *name == model)
            .map_or(1536, |(_, dim)| *dim);
        Self {
            client: Client::with_config(config),
            model,
            dimension,
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AgentError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = CreateEmbeddingRequest {
            model: self.model.clone(),
            input: EmbeddingInput::StringArray(texts.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        };
        tracing::debug!(model = %self.model, batch = texts.len(), "embedding request");

        let mut data = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| AgentError::retrieval(format!("embeddings: {}", e)))?
            .data;
        if data.len() != texts.len() {
            return Err(AgentError::retrieval(format!(
                "embeddings: sent {} texts, got {} vectors",
                texts.len(),
                data.len()
            )));
        }
        // The API tags each vector with its input position; order is not guaranteed.
        data.sort_by_key(|e| e.index);
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
