//! Mock LLM for tests and demos.
//!
//! Returns scripted responses in order and records every call, so tests can assert
//! how many completions a turn made and what each stage sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, ResponseFormat};

/// One recorded `complete` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmCall {
    pub system: String,
    pub user: String,
    pub format: ResponseFormat,
}

/// Mock LLM: scripted responses, consumed in order.
///
/// When the script runs out, the last response is repeated. A script entry may be an
/// error, which is returned as `AgentError::Capability` for that call.
///
/// **Interaction**: Implements `LlmClient`; injected into `RavlRunner` in tests.
pub struct MockLlm {
    script: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<Result<String, String>>>,
    calls: Mutex<Vec<LlmCall>>,
}

impl MockLlm {
    /// Creates a mock that answers with `responses` in order.
    pub fn new<I, T>(responses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            script: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock that always returns `content`.
    pub fn with_fixed(content: impl Into<String>) -> Self {
        Self::new([content.into()])
    }

    /// Creates a mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let mock = Self::new(Vec::<String>::new());
        mock.push_error(message);
        mock
    }

    /// Appends a successful response to the script.
    pub fn push(&self, content: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Ok(content.into()));
        }
    }

    /// Appends a failing call to the script.
    pub fn push_error(&self, message: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(message.into()));
        }
    }

    /// All calls received so far, oldest first.
    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(LlmCall {
                system: system.to_string(),
                user: user.to_string(),
                format,
            });
        }

        let next = self
            .script
            .lock()
            .map_err(|_| AgentError::llm("mock script poisoned"))?
            .pop_front();
        let mut last = self
            .last
            .lock()
            .map_err(|_| AgentError::llm("mock script poisoned"))?;
        if let Some(entry) = next {
            *last = Some(entry);
        }
        match last.as_ref() {
            Some(Ok(content)) => Ok(content.clone()),
            Some(Err(message)) => Err(AgentError::llm(message.clone())),
            None => Err(AgentError::llm("mock has no scripted response")),
        }
    }
}
