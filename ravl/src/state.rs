//! Workflow state threaded through the validation loop.
//!
//! One `WorkflowState` is created per turn and discarded after the answer is
//! returned. Each node receives the whole record and returns the whole record.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Critic verdict on the current draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    /// No critique has run yet.
    #[default]
    Unset,
    Pass,
    Fail,
}

/// State of one question-answering turn.
///
/// `original_question` and `history` never change after construction.
/// `search_query` is assigned once by the rewrite stage and `grounding_text` once by
/// retrieval. `revision_count` only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub original_question: String,
    pub search_query: String,
    pub grounding_text: String,
    /// Titles of the retrieved passages, in retrieval order.
    pub sources: Vec<String>,
    pub draft_answer: String,
    pub critique_feedback: String,
    pub grade: Grade,
    pub revision_count: u32,
    /// Number of critic runs in this turn.
    pub critique_count: u32,
    pub history: Vec<Message>,
}

impl WorkflowState {
    /// Initial state for a turn: `search_query` starts as the question itself.
    pub fn new(question: impl Into<String>, history: Vec<Message>) -> Self {
        let question = question.into();
        Self {
            search_query: question.clone(),
            original_question: question,
            history,
            ..Default::default()
        }
    }
}
