//! # RAVL
//!
//! Retrieval-augmented validation loop for question answering over a company's
//! HR regulations. Each turn rewrites the user's question into a standalone search
//! query, retrieves regulation passages, drafts an answer from those passages only,
//! and lets a critic grade the draft. Failing drafts are revised against the critique
//! until the critic passes one or the revision cap is reached.
//!
//! ## Flow
//!
//! ```text
//! START → rewrite_query → retrieve → draft → critique ─┬─ PASS ──────────→ END
//!                                               ▲      ├─ FAIL, cap hit ─→ END
//!                                               │      └─ FAIL ─→ revise ─┐
//!                                               └──────────────────────────┘
//! ```
//!
//! The grounding text is fixed after `retrieve`; revisions never trigger a new search.
//!
//! ## Main modules
//!
//! - [`runner`]: [`RavlRunner`], [`AnswerOutcome`], [`RunError`]; one call per turn.
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`]; the loop engine.
//! - [`nodes`]: the five stages as graph nodes.
//! - [`routing`]: [`route_after_critique`], the single branching decision.
//! - [`llm`]: [`LlmClient`] with [`ChatOpenAI`] and [`MockLlm`].
//! - [`retriever`]: [`Retriever`] with [`VectorRetriever`] and [`StaticRetriever`].
//! - [`config`]: [`RavlConfig`] read from the environment.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ravl::{Message, MockLlm, RavlConfig, RavlRunner, StaticRetriever, Passage};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(MockLlm::new([
//!     "연차 유급휴가 부여 일수",
//!     "제10조에 따라 15일입니다.",
//!     r#"{"grade":"PASS","critique":"근거와 일치합니다."}"#,
//! ]));
//! let retriever = Arc::new(StaticRetriever::new(vec![Passage::new(
//!     "제10조 (연차휴가)",
//!     "1년간 80퍼센트 이상 출근한 근로자에게 15일의 유급휴가를 준다.",
//! )]));
//! let runner = RavlRunner::new(llm, retriever, RavlConfig::default())?;
//! let history = vec![Message::user("안녕하세요"), Message::assistant("무엇을 도와드릴까요?")];
//! let outcome = runner.answer("연차는 며칠인가요?", &history).await?;
//! println!("{}", outcome.final_answer);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod nodes;
pub mod prompts;
pub mod retriever;
pub mod routing;
pub mod runner;
pub mod state;
pub mod stream;

pub use config::{ConfigError, RavlConfig};
pub use error::AgentError;
pub use graph::{
    CallTimeoutMiddleware, CompilationError, CompiledStateGraph, Next, Node, NodeMiddleware,
    StateGraph, StreamRun, END, START,
};
pub use llm::{ChatOpenAI, LlmCall, LlmClient, MockLlm, ResponseFormat};
pub use message::{Message, Role};
pub use prompts::NOT_SPECIFIED_ANSWER;
pub use retriever::{
    format_grounding, Corpus, CorpusError, Embedder, OpenAIEmbedder, Passage, Retriever,
    StaticRetriever, VectorRetriever,
};
pub use routing::{route_after_critique, Transition};
pub use runner::{build_graph, AnswerOutcome, RavlRunner, RunError};
pub use state::{Grade, WorkflowState};
pub use stream::{StreamEvent, StreamMode};
