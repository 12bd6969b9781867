//! Prompt text for the four LLM-backed stages.
//!
//! System prompts are fixed; everything that varies per turn (question, history,
//! grounding, draft, feedback) goes into the user message built here.

use crate::context;
use crate::message::Message;

/// Canonical answer when the regulations do not cover the question.
pub const NOT_SPECIFIED_ANSWER: &str = "해당 내용은 규정에 명시되어 있지 않습니다.";

pub const REWRITE_SYSTEM_PROMPT: &str = r#"당신은 대화 맥락을 이해하여 질문을 재작성하는 전문가입니다.

사용자의 현재 질문이 이전 대화를 참조하는 경우(예: "그럼 그건?", "더 알려줘"), 이전 대화 내용을 바탕으로 독립적이고 명확한 질문으로 재작성하세요.
구어체 표현은 취업규칙의 공식 용어로 바꾸고, 필요하면 동의어를 괄호로 덧붙이세요. (예: "월차" → "월차(월 단위 유급휴가)")

예시:
- 이전 대화에서 "연차"에 대해 이야기했고 현재 질문이 "그럼 월차는?"이면
  → "취업규칙에서 월차 휴가는 어떻게 되나요?"

중요:
- 재작성된 질문만 출력하세요. 설명이나 부가 문구 없이.
- 취업규칙/인사규정 맥락을 유지하세요."#;

pub const DRAFT_SYSTEM_PROMPT: &str = r#"당신은 회사 취업규칙 전문 상담사입니다.

사용자 메시지의 [검색된 규정]만을 근거로 답변하세요.

답변 원칙:
1. 검색된 규정에 명시된 내용만 답변합니다. 외부 지식과 추측은 금지합니다.
2. 각 내용마다 근거가 된 문서 제목이나 조항 번호를 밝힙니다.
3. 질문의 구어체 표현과 규정의 공식 용어가 같은 의미라면 같은 것으로 보고 답변합니다.
4. 관련 내용이 규정에 없으면 "해당 내용은 규정에 명시되어 있지 않습니다."라고만 답변합니다.
5. [이전 대화]는 말투와 흐름을 맞추는 참고용이며 근거가 아닙니다."#;

pub const CRITIQUE_SYSTEM_PROMPT: &str = r#"당신은 엄격한 사실 검증 전문가입니다.

주어진 답변이 규정 원문에 정확히 근거하는지 검증하세요. 판단은 답변과 규정 원문만으로 합니다.

다음 중 하나라도 해당하면 FAIL입니다:
1. 규정 원문에 없는 내용을 주장함
2. 규정에 근거하지 않은 추측성 표현이나 조언("~일 수 있습니다", "인사팀에 문의하세요" 등)을 덧붙임
3. 규정에 근거한 내용이라도 조항 번호나 문서 제목 인용이 빠짐
4. "규정에 명시되어 있지 않습니다"라고 답한 뒤 근거 없는 부연 설명을 덧붙임

모두 해당하지 않으면 PASS입니다.

반드시 다음 JSON 객체 하나만 출력하세요:
{"grade": "PASS" 또는 "FAIL", "critique": "판단 이유. FAIL이면 구체적인 문제점"}"#;

pub const REVISE_SYSTEM_PROMPT: &str = r#"당신은 검증 피드백을 받아 답변을 개선하는 전문가입니다.

사용자 메시지의 [검증 피드백]을 모두 반영하여 [기존 답변]을 수정하세요.
반드시 [규정 원문]에 근거한 내용만 포함하고, 각 내용의 조항 번호나 문서 제목을 밝히세요.
수정된 답변만 출력하세요."#;

/// User message for query rewriting.
pub fn rewrite_user(question: &str, history: &[Message]) -> String {
    format!(
        "이전 대화:\n{}\n\n현재 질문: {}\n\n재작성된 질문:",
        context::render_dialogue(history),
        question
    )
}

/// User message for the first draft. History, when present, is reference-only.
pub fn draft_user(query: &str, grounding: &str, history: &[Message]) -> String {
    let mut out = format!("[검색된 규정]\n{}\n\n", grounding);
    if !history.is_empty() {
        out.push_str(&format!(
            "[이전 대화]\n{}\n\n",
            context::render_reference(history)
        ));
    }
    out.push_str(&format!("[질문]\n{}", query));
    out
}

/// User message for the critic.
pub fn critique_user(query: &str, draft: &str, grounding: &str) -> String {
    format!(
        "질문: {}\n\n답변:\n{}\n\n규정 원문:\n{}\n\n평가를 시작하세요.",
        query, draft, grounding
    )
}

/// User message for a revision.
pub fn revise_user(query: &str, draft: &str, critique: &str, grounding: &str) -> String {
    format!(
        "[검증 피드백]\n{}\n\n[규정 원문]\n{}\n\n질문: {}\n\n[기존 답변]\n{}\n\n수정된 답변:",
        critique, grounding, query, draft
    )
}
