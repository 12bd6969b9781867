//! Termination and counter guarantees of the draft-critique-revise loop.

use std::sync::Arc;

use ravl::{Grade, Message, RavlConfig, RavlRunner, StaticRetriever};

use crate::common::{fail, leave_passages, pass, Stage, StageLlm};

fn config(max_revisions: u32) -> RavlConfig {
    RavlConfig {
        max_revisions,
        ..RavlConfig::default()
    }
}

/// **Scenario**: a critic that always fails stops the loop at the cap and the last
/// revision is returned unvalidated.
#[tokio::test]
async fn always_failing_critic_stops_at_revision_cap() {
    for max_revisions in [0u32, 1, 2, 4] {
        let llm = Arc::new(
            StageLlm::new()
                .script(Stage::Draft, ["초안"])
                .script(Stage::Critique, [fail("조항 인용 누락")])
                .script(Stage::Revise, ["수정안 1", "수정안 2", "수정안 3", "수정안 4"]),
        );
        let retriever = Arc::new(StaticRetriever::new(leave_passages()));
        let runner = RavlRunner::new(llm.clone(), retriever.clone(), config(max_revisions)).unwrap();

        let outcome = runner.answer("연차는 며칠인가요?", &[]).await.unwrap();

        assert_eq!(outcome.revision_count, max_revisions);
        assert_eq!(outcome.grade, Grade::Fail);
        assert!(!outcome.is_validated());
        assert_eq!(llm.count(Stage::Critique), max_revisions as usize + 1);
        assert_eq!(llm.count(Stage::Revise), max_revisions as usize);
        let expected = if max_revisions == 0 {
            "초안".to_string()
        } else {
            format!("수정안 {}", max_revisions)
        };
        assert_eq!(outcome.final_answer, expected);
        assert_eq!(retriever.call_count(), 1);
    }
}

/// **Scenario**: a first-pass PASS ends the turn after one critique and no revision.
#[tokio::test]
async fn immediate_pass_makes_no_revision() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["제10조에 따라 15일입니다."])
            .script(Stage::Critique, [pass("근거와 일치")]),
    );
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig::default(),
    )
    .unwrap();

    let outcome = runner.answer("연차는 며칠인가요?", &[]).await.unwrap();

    assert_eq!(outcome.final_answer, "제10조에 따라 15일입니다.");
    assert_eq!(outcome.revision_count, 0);
    assert!(outcome.is_validated());
    assert_eq!(llm.count(Stage::Critique), 1);
    assert_eq!(llm.count(Stage::Revise), 0);
}

/// **Scenario**: each revision feeds the critic the newest draft, and the counter
/// grows by one per revision.
#[tokio::test]
async fn each_critique_sees_the_latest_draft() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["초안"])
            .script(Stage::Critique, [fail("a"), fail("b"), pass("ok")])
            .script(Stage::Revise, ["수정안 1", "수정안 2"]),
    );
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::new(leave_passages())),
        config(3),
    )
    .unwrap();

    let outcome = runner.answer("연차는?", &[]).await.unwrap();
    assert_eq!(outcome.revision_count, 2);
    assert_eq!(outcome.final_answer, "수정안 2");

    let critiques = llm.users(Stage::Critique);
    assert_eq!(critiques.len(), 3);
    assert!(critiques[0].contains("초안"));
    assert!(critiques[1].contains("수정안 1"));
    assert!(critiques[2].contains("수정안 2"));

    let revisions = llm.users(Stage::Revise);
    assert!(revisions[0].contains("[검증 피드백]\na"));
    assert!(revisions[1].contains("[검증 피드백]\nb"));
}

/// **Scenario**: grounding is retrieved once and every later stage sees the same text.
#[tokio::test]
async fn grounding_is_fixed_across_revisions() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["초안"])
            .script(Stage::Critique, [fail("x"), fail("y"), pass("ok")])
            .script(Stage::Revise, ["r1", "r2"]),
    );
    let retriever = Arc::new(StaticRetriever::new(leave_passages()));
    let runner = RavlRunner::new(llm.clone(), retriever.clone(), RavlConfig::default()).unwrap();

    runner.answer("연차는?", &[]).await.unwrap();

    assert_eq!(retriever.call_count(), 1);
    let grounding = "[문서 1] 제10조 (연차휴가)\n1년간 80퍼센트 이상 출근한 근로자에게 15일의 유급휴가를 준다.\n\n---\n\n[문서 2] 제11조 (월차휴가)";
    for user in llm
        .users(Stage::Critique)
        .iter()
        .chain(llm.users(Stage::Revise).iter())
        .chain(llm.users(Stage::Draft).iter())
    {
        assert!(user.contains(grounding), "{}", user);
    }
}

/// **Scenario**: without history the question is searched as asked and no rewrite call is made.
#[tokio::test]
async fn empty_history_skips_rewrite() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Draft, ["제10조에 따라 15일입니다."])
            .script(Stage::Critique, [pass("ok")]),
    );
    let retriever = Arc::new(StaticRetriever::new(leave_passages()));
    let runner = RavlRunner::new(llm.clone(), retriever.clone(), RavlConfig::default()).unwrap();

    let outcome = runner.answer("연차는 며칠인가요?", &[]).await.unwrap();

    assert_eq!(llm.count(Stage::Rewrite), 0);
    assert_eq!(outcome.search_query, "연차는 며칠인가요?");
    assert_eq!(retriever.queries(), vec!["연차는 며칠인가요?".to_string()]);
}

/// **Scenario**: history longer than the window still triggers a rewrite, but only the
/// most recent entries are shown.
#[tokio::test]
async fn rewrite_sees_only_the_history_window() {
    let llm = Arc::new(
        StageLlm::new()
            .script(Stage::Rewrite, ["월차 휴가 규정"])
            .script(Stage::Draft, ["d"])
            .script(Stage::Critique, [pass("ok")]),
    );
    let runner = RavlRunner::new(
        llm.clone(),
        Arc::new(StaticRetriever::new(leave_passages())),
        RavlConfig {
            max_chat_history: 2,
            ..RavlConfig::default()
        },
    )
    .unwrap();
    let history = vec![
        Message::user("첫 질문"),
        Message::assistant("첫 답변"),
        Message::user("연차는?"),
        Message::assistant("15일입니다."),
    ];

    let outcome = runner.answer("그럼 월차는?", &history).await.unwrap();

    assert_eq!(outcome.search_query, "월차 휴가 규정");
    let rewrite = &llm.users(Stage::Rewrite)[0];
    assert!(rewrite.contains("사용자: 연차는?\nAI: 15일입니다."), "{}", rewrite);
    assert!(!rewrite.contains("첫 질문"), "{}", rewrite);
}
