//! Shared fixtures for workflow tests: a stage-aware scripted LLM and a small corpus.
//!
//! `StageLlm` dispatches on the system prompt, so each stage gets its own script
//! regardless of how many times the loop cycles.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ravl::prompts::{
    CRITIQUE_SYSTEM_PROMPT, DRAFT_SYSTEM_PROMPT, REVISE_SYSTEM_PROMPT, REWRITE_SYSTEM_PROMPT,
};
use ravl::{AgentError, LlmClient, Passage, ResponseFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Rewrite,
    Draft,
    Critique,
    Revise,
}

impl Stage {
    fn from_system(system: &str) -> Option<Self> {
        match system {
            s if s == REWRITE_SYSTEM_PROMPT => Some(Stage::Rewrite),
            s if s == DRAFT_SYSTEM_PROMPT => Some(Stage::Draft),
            s if s == CRITIQUE_SYSTEM_PROMPT => Some(Stage::Critique),
            s if s == REVISE_SYSTEM_PROMPT => Some(Stage::Revise),
            _ => None,
        }
    }
}

pub fn pass(critique: &str) -> String {
    format!(r#"{{"grade":"PASS","critique":"{}"}}"#, critique)
}

pub fn fail(critique: &str) -> String {
    format!(r#"{{"grade":"FAIL","critique":"{}"}}"#, critique)
}

#[derive(Default)]
struct Inner {
    scripts: HashMap<Stage, VecDeque<Result<String, String>>>,
    last: HashMap<Stage, Result<String, String>>,
    calls: Vec<(Stage, String)>,
}

/// LLM with one script per stage. The last entry of a script repeats once it runs out.
#[derive(Default)]
pub struct StageLlm {
    inner: Mutex<Inner>,
    delays: HashMap<Stage, Duration>,
}

impl StageLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script<I, T>(self, stage: Stage, responses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.inner
            .lock()
            .unwrap()
            .scripts
            .entry(stage)
            .or_default()
            .extend(responses.into_iter().map(|r| Ok(r.into())));
        self
    }

    pub fn fail_with(self, stage: Stage, message: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .scripts
            .entry(stage)
            .or_default()
            .push_back(Err(message.to_string()));
        self
    }

    /// Every call of `stage` sleeps for `delay` before answering.
    pub fn delay(mut self, stage: Stage, delay: Duration) -> Self {
        self.delays.insert(stage, delay);
        self
    }

    pub fn count(&self, stage: Stage) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(s, _)| *s == stage)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    /// User messages sent to `stage`, oldest first.
    pub fn users(&self, stage: Stage) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, u)| u.clone())
            .collect()
    }
}

#[async_trait]
impl LlmClient for StageLlm {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String, AgentError> {
        let stage = Stage::from_system(system)
            .ok_or_else(|| AgentError::llm("unknown system prompt"))?;
        assert_eq!(
            format == ResponseFormat::Json,
            stage == Stage::Critique,
            "only the critic asks for JSON"
        );
        if let Some(delay) = self.delays.get(&stage) {
            tokio::time::sleep(*delay).await;
        }

        let mut inner = self.inner.lock().unwrap();
        inner.calls.push((stage, user.to_string()));
        let next = inner.scripts.get_mut(&stage).and_then(|s| s.pop_front());
        if let Some(entry) = next {
            inner.last.insert(stage, entry);
        }
        match inner.last.get(&stage) {
            Some(Ok(content)) => Ok(content.clone()),
            Some(Err(message)) => Err(AgentError::llm(message.clone())),
            None => Err(AgentError::llm(format!("no script for {:?}", stage))),
        }
    }
}

/// Two articles of a small employment-rules corpus.
pub fn leave_passages() -> Vec<Passage> {
    vec![
        Passage::new(
            "제10조 (연차휴가)",
            "1년간 80퍼센트 이상 출근한 근로자에게 15일의 유급휴가를 준다.",
        ),
        Passage::new(
            "제11조 (월차휴가)",
            "계속하여 근로한 기간이 1년 미만인 근로자에게 1개월 개근 시 1일의 유급휴가를 준다.",
        ),
    ]
}
