//! End-to-end turns modelled on real conversations with the regulation assistant.

use std::sync::Arc;

use ravl::{Grade, Message, RavlConfig, RavlRunner, StaticRetriever, NOT_SPECIFIED_ANSWER};

use crate::common::{fail, leave_passages, pass, Stage, StageLlm};

/// **Scenario**: follow-up "그럼 월차는?" after a question about annual leave. The query is
/// rewritten from history, the critic rejects twice, and the second revision passes.
#[tokio::test]
async fn follow_up_question_is_rewritten_and_revised_until_pass() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Rewrite, ["취업규칙에서 월차 휴가는 어떻게 되나요?"])
            .script(Stage::Draft, ["월차는 한 달에 하루입니다."])
            .script(
                Stage::Critique,
                [
                    fail("조항 번호 인용이 없습니다."),
                    fail("'인사팀에 문의하세요'는 규정에 없는 조언입니다."),
                    pass("제11조에 근거합니다."),
                ],
            )
            .script(
                Stage::Revise,
                [
                    "월차는 한 달에 하루입니다. 자세한 내용은 인사팀에 문의하세요.",
                    "제11조 (월차휴가)에 따라 1년 미만 근로자는 1개월 개근 시 1일의 유급휴가를 받습니다.",
                ],
            ),
    );
    let retriever = Arc::new(StaticRetriever::new(leave_passages()));
    let runner = RavlRunner::new(llm.clone(), retriever.clone(), RavlConfig::default()).unwrap();
    let history = vec![
        Message::user("연차는 며칠인가요?"),
        Message::assistant("제10조 (연차휴가)에 따라 15일입니다."),
    ];

    let outcome = runner.answer("그럼 월차는?", &history).await.unwrap();

    assert_eq!(
        outcome.final_answer,
        "제11조 (월차휴가)에 따라 1년 미만 근로자는 1개월 개근 시 1일의 유급휴가를 받습니다."
    );
    assert_eq!(outcome.revision_count, 2);
    assert_eq!(outcome.grade, Grade::Pass);
    assert_eq!(outcome.search_query, "취업규칙에서 월차 휴가는 어떻게 되나요?");
    assert_eq!(
        outcome.sources,
        vec!["제10조 (연차휴가)".to_string(), "제11조 (월차휴가)".to_string()]
    );
    assert_eq!(
        retriever.queries(),
        vec!["취업규칙에서 월차 휴가는 어떻게 되나요?".to_string()]
    );
    assert_eq!(llm.count(Stage::Rewrite), 1);
    assert_eq!(llm.count(Stage::Critique), 3);

    // Draft sees the rewritten query and the history only as reference.
    let draft = &llm.users(Stage::Draft)[0];
    assert!(draft.contains("[질문]\n취업규칙에서 월차 휴가는 어떻게 되나요?"), "{}", draft);
    assert!(draft.contains("[이전 대화]"), "{}", draft);
}

/// **Scenario**: nothing relevant is retrieved. The canonical answer is produced without
/// a draft completion and the critic accepts it.
#[tokio::test]
async fn empty_retrieval_answers_not_specified() {
    let llm = Arc::new(StageLlm::new().script(Stage::Critique, [pass("근거 없음을 정확히 밝힘")]));
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::empty()),
        RavlConfig::default(),
    )
    .unwrap();

    let outcome = runner.answer("주차 지원금은 얼마인가요?", &[]).await.unwrap();

    assert_eq!(outcome.final_answer, NOT_SPECIFIED_ANSWER);
    assert_eq!(outcome.revision_count, 0);
    assert!(outcome.is_validated());
    assert!(outcome.sources.is_empty());
    assert_eq!(llm.count(Stage::Draft), 0);
    assert_eq!(llm.count(Stage::Critique), 1);
}

/// **Scenario**: `retriever_k` bounds the passages that reach the grounding text.
#[tokio::test]
async fn retriever_k_limits_grounding() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["제10조에 따라 15일입니다."])
            .script(Stage::Critique, [pass("ok")]),
    );
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig {
            retriever_k: 1,
            ..RavlConfig::default()
        },
    )
    .unwrap();

    let outcome = runner.answer("연차는?", &[]).await.unwrap();

    assert_eq!(outcome.sources, vec!["제10조 (연차휴가)".to_string()]);
    let draft = &llm.users(Stage::Draft)[0];
    assert!(draft.contains("[문서 1] 제10조"));
    assert!(!draft.contains("[문서 2]"));
}

/// **Scenario**: the caller's history is a snapshot and is left untouched by a turn.
#[tokio::test]
async fn caller_history_is_not_modified() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Rewrite, ["월차 규정"])
            .script(Stage::Draft, ["d"])
            .script(Stage::Critique, [pass("ok")]),
    );
    let runner = RavlRunner::new(
        llm,
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig::default(),
    )
    .unwrap();
    let history = vec![Message::user("연차는?"), Message::assistant("15일")];
    let before = history.clone();

    runner.answer("그럼 월차는?", &history).await.unwrap();
    assert_eq!(history, before);
}

/// **Scenario**: one runner serves concurrent turns without mixing their state.
#[tokio::test]
async fn concurrent_turns_are_independent() {
    let runner = Arc::new(
        RavlRunner::new(
            Arc::new(
                StageLlm::new()
                    .script(Stage::Draft, ["제10조에 따라 15일입니다."])
                    .script(Stage::Critique, [pass("ok")]),
            ),
            Arc::new(StaticRetriever::new(leave_passages())),
            RavlConfig::default(),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let runner = Arc::clone(&runner);
            tokio::spawn(async move {
                let question = format!("질문 {}", i);
                let outcome = runner.answer(&question, &[]).await.unwrap();
                (question, outcome)
            })
        })
        .collect();

    for handle in handles {
        let (question, outcome) = handle.await.unwrap();
        assert_eq!(outcome.search_query, question);
        assert_eq!(outcome.revision_count, 0);
        assert!(outcome.is_validated());
    }
}
