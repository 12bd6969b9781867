//! Fixed-passage retriever for tests and demos.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;

use super::{Passage, Retriever};

/// Returns the first `k` of a fixed passage list for every query and records the queries.
///
/// **Interaction**: Implements `Retriever`; injected into `RavlRunner` in tests so a turn
/// can be checked for exactly one retrieval call.
pub struct StaticRetriever {
    passages: Vec<Passage>,
    queries: Mutex<Vec<String>>,
}

impl StaticRetriever {
    pub fn new(passages: Vec<Passage>) -> Self {
        Self {
            passages,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Retriever that never finds anything.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>, AgentError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        Ok(self.passages.iter().take(k).cloned().collect())
    }
}
