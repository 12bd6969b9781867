//! `stream_answer`: stage progress events for a turn.

use std::sync::Arc;
use std::time::Duration;

use ravl::{RavlConfig, RavlRunner, RunError, StaticRetriever, StreamEvent};

use crate::common::{fail, leave_passages, pass, Stage, StageLlm};

fn started(events: &[StreamEvent<ravl::WorkflowState>]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::TaskStart { node_id } => Some(node_id.clone()),
            _ => None,
        })
        .collect()
}

/// **Scenario**: stages are reported in execution order, including the revise cycle.
#[tokio::test]
async fn stream_reports_stages_in_order() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["d"])
            .script(Stage::Critique, [fail("x"), pass("ok")])
            .script(Stage::Revise, ["r"]),
    );
    let runner = RavlRunner::new(
        llm,
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig::default(),
    )
    .unwrap();

    let mut events = Vec::new();
    let outcome = runner
        .stream_answer("연차는?", &[], |e| events.push(e))
        .await
        .unwrap();

    assert_eq!(outcome.final_answer, "r");
    assert_eq!(
        started(&events),
        vec!["rewrite_query", "retrieve", "draft", "critique", "revise", "critique"]
    );

    let last_update = events.iter().rev().find_map(|e| match e {
        StreamEvent::Updates { node_id, state } => Some((node_id.clone(), state.clone())),
        _ => None,
    });
    let (node_id, state) = last_update.unwrap();
    assert_eq!(node_id, "critique");
    assert_eq!(state.revision_count, 1);
    assert_eq!(state.critique_count, 2);
}

/// **Scenario**: a failing stage is reported as a failed task and the error is returned.
#[tokio::test]
async fn stream_reports_failure_and_returns_error() {
    let llm = Arc::new(StageLlm::new().fail_with(Stage::Draft, "quota exceeded"));
    let runner = RavlRunner::new(
        llm,
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig::default(),
    )
    .unwrap();

    let mut events = Vec::new();
    let err = runner
        .stream_answer("연차는?", &[], |e| events.push(e))
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::Execution(_)));
    match events.last() {
        Some(StreamEvent::TaskEnd {
            node_id,
            result: Err(message),
        }) => {
            assert_eq!(node_id, "draft");
            assert!(message.contains("quota exceeded"));
        }
        other => panic!("expected failed draft task, got {:?}", other),
    }
}

/// **Scenario**: a caller that gives up on a streamed turn stops it; no stage runs afterwards.
#[tokio::test]
async fn abandoned_stream_stops_calling_the_model() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["d"])
            .script(Stage::Critique, [pass("ok")])
            .delay(Stage::Draft, Duration::from_millis(100)),
    );
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig::default(),
    )
    .unwrap();

    let turn = runner.stream_answer("연차는?", &[], |_| {});
    assert!(tokio::time::timeout(Duration::from_millis(20), turn)
        .await
        .is_err());
    assert_eq!(llm.total_calls(), 0);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(llm.total_calls(), 0, "turn kept running after the caller left");
}
