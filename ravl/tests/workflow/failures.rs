//! Failure propagation: capability errors, malformed critiques and timeouts end the turn.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ravl::{
    AgentError, Passage, RavlConfig, RavlRunner, Retriever, RunError, StaticRetriever,
};

use crate::common::{fail, leave_passages, Stage, StageLlm};

struct DownRetriever;

#[async_trait]
impl Retriever for DownRetriever {
    async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<Passage>, AgentError> {
        Err(AgentError::retrieval("index unreachable"))
    }
}

/// **Scenario**: a failed draft completion is reported, not replaced by default text.
#[tokio::test]
async fn llm_failure_aborts_the_turn() {
    let llm = Arc::new(StageLlm::new().fail_with(Stage::Draft, "rate limited"));
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig::default(),
    )
    .unwrap();

    let err = runner.answer("연차는?", &[]).await.unwrap_err();

    match &err {
        RunError::Execution(AgentError::Capability {
            capability,
            message,
        }) => {
            assert_eq!(*capability, "completion");
            assert!(message.contains("rate limited"));
        }
        other => panic!("expected capability error, got {:?}", other),
    }
    assert!(err.is_transient());
    assert_eq!(llm.count(Stage::Critique), 0);
}

#[tokio::test]
async fn retrieval_failure_aborts_before_drafting() {
    let llm = Arc::new(StageLlm::new());
    let runner = RavlRunner::new(llm.clone(), Arc::new(DownRetriever), RavlConfig::default()).unwrap();

    let err = runner.answer("연차는?", &[]).await.unwrap_err();

    assert!(
        matches!(
            err,
            RunError::Execution(AgentError::Capability {
                capability: "retrieval",
                ..
            })
        ),
        "{:?}",
        err
    );
    assert_eq!(llm.total_calls(), 0);
}

/// **Scenario**: a critic reply that is not `{grade, critique}` fails the turn instead of
/// being read as PASS or FAIL.
#[tokio::test]
async fn malformed_critique_is_a_turn_error() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["d"])
            .script(Stage::Critique, ["평가 결과: PASS"]),
    );
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig::default(),
    )
    .unwrap();

    let err = runner.answer("연차는?", &[]).await.unwrap_err();

    assert!(
        matches!(err, RunError::Execution(AgentError::MalformedCritique(_))),
        "{:?}",
        err
    );
    assert!(!err.is_transient());
    assert_eq!(llm.count(Stage::Revise), 0);
}

/// **Scenario**: a revision that fails mid-loop discards the partial answer.
#[tokio::test]
async fn revise_failure_after_a_fail_grade_is_reported() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["d"])
            .script(Stage::Critique, [fail("x")])
            .fail_with(Stage::Revise, "connection reset"),
    );
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig::default(),
    )
    .unwrap();

    let err = runner.answer("연차는?", &[]).await.unwrap_err();
    assert!(err.to_string().contains("connection reset"), "{}", err);
    assert_eq!(llm.count(Stage::Critique), 1);
}

/// **Scenario**: a stage slower than `call_timeout` ends the turn with a timeout naming it.
#[tokio::test]
async fn slow_stage_times_out() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["d"])
            .delay(Stage::Draft, Duration::from_secs(5)),
    );
    let runner = RavlRunner::new(
        llm,
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig {
            call_timeout: Duration::from_millis(50),
            ..RavlConfig::default()
        },
    )
    .unwrap();

    let err = runner.answer("연차는?", &[]).await.unwrap_err();

    match err {
        RunError::Execution(AgentError::Timeout { stage, after }) => {
            assert_eq!(stage, "draft");
            assert_eq!(after, Duration::from_millis(50));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}
