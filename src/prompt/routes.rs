//! Route table: one entry per prompt kind
//!
//! Each route owns its context label and a builder that turns the user's
//! text (plus optional auxiliary input) into either a prompt for the remote
//! service or a local reply. Adding a kind means adding a route here.

use super::templates::{
    ANSWER_IN_KOREAN, CODE_INPUT_REQUIRED, ENVIRONMENT_PERSONA, GUIDE_PERSONA,
    PRACTICE_ENVIRONMENT, PRACTICE_RULES, PROMPT_PERSONA, REVIEWER_PERSONA, TUTOR_PERSONA,
};
use super::{PromptInput, PromptKind, PromptPlan};

/// A prompt route
pub struct Route {
    pub kind: PromptKind,
    /// Names the operation in failure explanations
    pub context_label: &'static str,
    pub build: fn(&PromptInput<'_>) -> PromptPlan,
}

static GENERAL: Route = Route {
    kind: PromptKind::General,
    context_label: "일반 질문 처리",
    build: build_general,
};

static ERROR_ANALYSIS: Route = Route {
    kind: PromptKind::ErrorAnalysis,
    context_label: "오류 분석",
    build: build_error_analysis,
};

static CODE_REVIEW: Route = Route {
    kind: PromptKind::CodeReview,
    context_label: "코드 리뷰",
    build: build_code_review,
};

static LEARNING_GUIDE: Route = Route {
    kind: PromptKind::LearningGuide,
    context_label: "학습 가이드 생성",
    build: build_learning_guide,
};

static ENVIRONMENT_FIX: Route = Route {
    kind: PromptKind::EnvironmentFix,
    context_label: "환경설정 오류 분석",
    build: build_environment_fix,
};

static PROMPT_OPTIMIZATION: Route = Route {
    kind: PromptKind::PromptOptimization,
    context_label: "프롬프트 최적화",
    build: build_prompt_optimization,
};

pub fn route_for(kind: PromptKind) -> &'static Route {
    match kind {
        PromptKind::General => &GENERAL,
        PromptKind::ErrorAnalysis => &ERROR_ANALYSIS,
        PromptKind::CodeReview => &CODE_REVIEW,
        PromptKind::LearningGuide => &LEARNING_GUIDE,
        PromptKind::EnvironmentFix => &ENVIRONMENT_FIX,
        PromptKind::PromptOptimization => &PROMPT_OPTIMIZATION,
    }
}

pub fn all_routes() -> [&'static Route; 6] {
    [
        &GENERAL,
        &ERROR_ANALYSIS,
        &CODE_REVIEW,
        &LEARNING_GUIDE,
        &ENVIRONMENT_FIX,
        &PROMPT_OPTIMIZATION,
    ]
}

/// Optional block, empty when there is no auxiliary input
fn section(heading: &str, body: Option<&str>) -> String {
    body.map(|b| format!("\n{heading}\n{b}\n"))
        .unwrap_or_default()
}

fn build_general(input: &PromptInput<'_>) -> PromptPlan {
    PromptPlan::Send(format!(
        "{TUTOR_PERSONA}

{PRACTICE_ENVIRONMENT}

💬 질문: {text}

⚡ 답변 형식:
1. 🎯 **핵심 답변** - 질문에 대한 직접적인 답
2. 🔧 **Cursor IDE 활용법** - AI 기능으로 해결하는 단계
3. 💻 **코드 예시** - 신승반점 프로젝트에 적용 가능한 코드
4. 🚀 **다음 단계** - 이어서 해볼 실습

{PRACTICE_RULES}

{ANSWER_IN_KOREAN}",
        text = input.text,
    ))
}

fn build_error_analysis(input: &PromptInput<'_>) -> PromptPlan {
    PromptPlan::Send(format!(
        "{TUTOR_PERSONA}

{PRACTICE_ENVIRONMENT}

🔍 오류 분석 요청:
{text}
{context}
⚡ 답변 형식:
1. 🎯 **문제 원인** - 실습 환경에서의 원인 분석
2. 🔧 **Cursor IDE 해결 방법** - Cursor AI 활용 단계별 해결법
3. 💡 **Cursor 프롬프트 예시** - 이 문제 해결용 프롬프트
4. 🛡️ **재발 방지** - 실습에서 주의할 점

{PRACTICE_RULES}

{ANSWER_IN_KOREAN}",
        text = input.text,
        context = section("📝 코드 컨텍스트 / 스택 트레이스:", input.auxiliary),
    ))
}

fn build_code_review(input: &PromptInput<'_>) -> PromptPlan {
    let Some(code) = input.auxiliary else {
        return PromptPlan::Reply(CODE_INPUT_REQUIRED.to_string());
    };
    let language = input.language;
    let question = if input.text.is_empty() {
        String::new()
    } else {
        format!("\n❓ 질문: {}\n", input.text)
    };

    PromptPlan::Send(format!(
        "{REVIEWER_PERSONA}

{PRACTICE_ENVIRONMENT}

📝 **검토 코드** ({language}):
```{language}
{code}
```
{question}
🔍 **검토 관점:**
1. 🐛 **오류 발견** - 실습에서 문제가 될 수 있는 부분
2. 🎯 **코드 품질** - 초보자에게 맞는 가독성 개선
3. ⚡ **성능** - 랜딩페이지 최적화
4. 🔧 **Cursor IDE 활용** - Cursor AI로 개선하는 방법
5. 📚 **모범 사례** - 프로젝트 표준 준수

답변 형식:
- 구체적인 문제점과 해결책 제시
- 바로 사용할 수 있는 개선된 코드 예시 제공
- 초보자도 이해할 수 있는 설명

{ANSWER_IN_KOREAN}"
    ))
}

fn build_learning_guide(input: &PromptInput<'_>) -> PromptPlan {
    PromptPlan::Send(format!(
        "{GUIDE_PERSONA}

{PRACTICE_ENVIRONMENT}

📚 **학습 주제:** \"{topic}\"

🔍 **가이드 구조:**
1. 🎯 **개념 설명** - 신승반점 프로젝트에서의 활용
2. 🔧 **Cursor IDE 활용법** - AI 기능으로 빠르게 구현하기
3. 🏮 **실습 예제** - 프로젝트에 적용 가능한 코드
4. 🚨 **자주 하는 실수** - 흔한 문제와 해결 방법
5. 🚀 **다음 실습 단계** - 이어서 진행할 내용

{PRACTICE_RULES}

{ANSWER_IN_KOREAN}",
        topic = input.text,
    ))
}

fn build_environment_fix(input: &PromptInput<'_>) -> PromptPlan {
    PromptPlan::Send(format!(
        "{ENVIRONMENT_PERSONA}

🖥️ 환경설정 오류:
{text}
{system}
🚀 해결 방법 (단계별):
1. **즉시 해결책** - 지금 바로 실행할 수 있는 명령어
2. **원인 분석** - 문제가 생긴 이유
3. **상세 해결 과정** - 단계별 자세한 설명
4. **검증 방법** - 해결되었는지 확인하는 방법
5. **예방 조치** - 같은 문제의 재발 방지

특별 요청:
- Windows/Mac/Linux 환경별 해결 방법 제시
- 터미널 명령어는 복사 가능한 형태로 제공
- 에러 메시지의 의미 설명

{ANSWER_IN_KOREAN}",
        text = input.text,
        system = section("💻 시스템 정보:", input.auxiliary),
    ))
}

fn build_prompt_optimization(input: &PromptInput<'_>) -> PromptPlan {
    PromptPlan::Send(format!(
        "{PROMPT_PERSONA}

🎯 현재 프롬프트:
{text}
{context}
⚡ 프롬프트 개선 방향:
1. **개선된 프롬프트** - 최적화된 버전
2. **개선 포인트** - 바뀐 부분과 이유
3. **효과적인 작성법** - 좋은 프롬프트의 원칙
4. **사용 팁** - 실제 사용 시 주의사항
5. **추가 변형** - 다른 상황에 맞춘 변형

{ANSWER_IN_KOREAN}",
        text = input.text,
        context = section("📋 컨텍스트 정보:", input.auxiliary),
    ))
}
