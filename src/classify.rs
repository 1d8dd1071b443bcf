//! Failure classification
//!
//! Turns a failed request into a readable explanation for the chat. The
//! match is on message text, case-insensitive, first match wins:
//! `quota` > `network`/`fetch` > `unauthorized`/`api key` > anything else.
//! Keep callers on [`classify`] so this can move to typed error codes later.

use crate::llm::gemini::API_KEY_CONSOLE_URL;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// User-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Quota,
    Network,
    Auth,
    Unknown,
}

impl FailureKind {
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |needle: &str| lower.contains(needle);

        if has("quota") {
            FailureKind::Quota
        } else if has("network") || has("fetch") {
            FailureKind::Network
        } else if has("unauthorized") || has("api key") {
            FailureKind::Auth
        } else {
            FailureKind::Unknown
        }
    }

    /// Ready-to-display explanation. `context` names the operation that
    /// failed and only appears in the Unknown text.
    pub fn explain(self, context: &str) -> String {
        match self {
            FailureKind::Quota => format!(
                "🚨 **API 할당량 초과**

**문제**: Gemini API 사용 할당량을 모두 사용했습니다.

**해결 방법**:
1. **잠시 기다리기** - 할당량이 다시 채워질 때까지 대기합니다 (보통 1분 내외)
2. **API 키 확인** - [Google AI Studio]({API_KEY_CONSOLE_URL})에서 키 사용량을 확인하거나 새 키를 발급합니다
3. **요청 줄이기** - 짧은 간격으로 여러 번 보내지 말고 질문을 모아서 보냅니다
4. **유료 플랜 검토** - 더 많은 호출이 필요하면 요금제를 올립니다

잠시 후 다시 시도해주세요."
            ),
            FailureKind::Network => "🌐 **네트워크 연결 문제**

**문제**: 인터넷 연결이 불안정하거나 AI 서비스에 접속할 수 없습니다.

**해결 방법**:
1. **인터넷 연결 확인** - Wi-Fi 또는 유선 연결 상태를 점검합니다
2. **방화벽 확인** - 보안 프로그램이 API 요청을 막고 있지 않은지 확인합니다
3. **VPN 해제** - VPN을 사용 중이라면 잠시 꺼 봅니다
4. **DNS 변경** - DNS 서버를 8.8.8.8 또는 1.1.1.1로 바꿔 봅니다

잠시 후 다시 시도해주세요."
                .to_string(),
            FailureKind::Auth => format!(
                "🔑 **API 키 인증 실패**

**문제**: API 키가 없거나 유효하지 않거나 권한이 없습니다.

**해결 방법**:
1. **키 상태 확인** - [Google AI Studio]({API_KEY_CONSOLE_URL})에서 키가 활성 상태인지 확인합니다
2. **새 키 발급** - 기존 키를 삭제하고 새 키를 만듭니다
3. **환경 변수 설정** - 실행 환경에 올바른 키를 지정합니다:
   ```
   GEMINI_API_KEY=your_api_key_here
   ```
4. **권한 확인** - 키에 Gemini API 사용 권한이 있는지 확인합니다

API 키는 외부에 공개되지 않도록 관리하세요."
            ),
            FailureKind::Unknown => format!(
                "😔 **AI 서비스 일시적 장애**

죄송합니다. {context} 중 일시적인 문제가 발생했습니다.

**해결 방법**:
1. **다시 시도** - 같은 질문을 한 번 더 보내 봅니다
2. **잠시 대기** - 1-2분 후 다시 시도해주세요
3. **새로고침** - 화면을 새로고침한 뒤 다시 질문합니다

문제가 계속되면 네트워크 연결을 확인해주세요."
            ),
        }
    }
}

/// Explain `failure`; pure and deterministic for the same text and context.
pub fn classify<E: Error + ?Sized>(failure: &E, context: &str) -> String {
    classify_message(Some(&failure.to_string()), context)
}

/// Explain a failure given only its message. `None` (a failure without
/// text) is Unknown.
pub fn classify_message(message: Option<&str>, context: &str) -> String {
    message
        .map_or(FailureKind::Unknown, FailureKind::from_message)
        .explain(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use proptest::prelude::*;

    #[test]
    fn test_keyword_matches() {
        assert_eq!(FailureKind::from_message("Quota exceeded for user"), FailureKind::Quota);
        assert_eq!(FailureKind::from_message("NetworkError when attempting"), FailureKind::Network);
        assert_eq!(FailureKind::from_message("Failed to fetch"), FailureKind::Network);
        assert_eq!(FailureKind::from_message("401 Unauthorized"), FailureKind::Auth);
        assert_eq!(FailureKind::from_message("API key not valid"), FailureKind::Auth);
        assert_eq!(FailureKind::from_message("something odd"), FailureKind::Unknown);
        assert_eq!(FailureKind::from_message(""), FailureKind::Unknown);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            FailureKind::from_message("network quota reached"),
            FailureKind::Quota
        );
        assert_eq!(
            FailureKind::from_message("fetch failed: unauthorized"),
            FailureKind::Network
        );
        assert_eq!(
            FailureKind::from_message("api key quota"),
            FailureKind::Quota
        );
    }

    #[test]
    fn test_quota_template_hides_raw_text() {
        let text = classify(&LlmError::unknown("Quota exceeded for user"), "오류 분석");
        assert!(text.contains("API 할당량 초과"));
        assert!(text.contains(API_KEY_CONSOLE_URL));
        assert!(!text.contains("Quota exceeded for user"));
    }

    #[test]
    fn test_auth_template_links_console() {
        let text = classify_message(Some("unauthorized"), "코드 리뷰");
        assert!(text.contains("API 키 인증 실패"));
        assert!(text.contains(API_KEY_CONSOLE_URL));
        assert!(text.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_unknown_embeds_context() {
        let text = classify_message(Some("boom"), "코드 리뷰");
        assert!(text.contains("코드 리뷰 중"));
        let network = classify_message(Some("network down"), "코드 리뷰");
        assert!(!network.contains("코드 리뷰"));
    }

    #[test]
    fn test_missing_message_is_unknown() {
        let text = classify_message(None, "오류 분석");
        assert_eq!(text, FailureKind::Unknown.explain("오류 분석"));
    }

    #[test]
    fn test_templates_have_remediation_steps() {
        for kind in [FailureKind::Quota, FailureKind::Network, FailureKind::Auth, FailureKind::Unknown] {
            let text = kind.explain("x");
            assert!(text.contains("1. "), "{kind:?}");
            assert!(text.contains("3. "), "{kind:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_classify_is_deterministic(message in ".{0,80}", context in "[가-힣 ]{0,10}") {
            let first = classify_message(Some(&message), &context);
            let second = classify_message(Some(&message), &context);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_case_insensitive(prefix in "[a-z ]{0,10}", upper in any::<bool>()) {
            let raw = format!("{prefix}quota");
            let message = if upper { raw.to_uppercase() } else { raw };
            prop_assert_eq!(FailureKind::from_message(&message), FailureKind::Quota);
        }
    }
}
