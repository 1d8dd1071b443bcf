//! Conversation session
//!
//! Elm-style: a pure [`transition`] decides what happens, the
//! [`ConversationSession`] runtime executes the resulting effects. Only the
//! prompt router call suspends; the session stays busy for its whole
//! duration, backoff delays included.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{CompletionRequest, Effect};
pub use event::Event;
pub use state::{Message, PendingExternalError, RequestId, Role, SessionContext, SessionState};
pub use transition::{transition, TransitionError, TransitionResult};

use crate::classify::classify;
use crate::config::AssistantConfig;
use crate::llm::LlmService;
use crate::prompt::{InteractionMode, PromptKind, PromptRouter};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::broadcast;

pub const WELCOME_MESSAGE: &str = "👋 안녕하세요! **신승반점 실습 전용 AI 어시스턴트**입니다! 🏮✨

**Cursor IDE로 신승반점 랜딩페이지 실습을 도와드립니다:**

🚨 **Cursor 실습 오류 해결**
• HTML/CSS/JavaScript 오류 수정
• Cursor AI 활용 팁 및 프롬프트 최적화
• 실시간 코드 에디터 사용법

⚙️ **실습 환경 설정**
• Cursor IDE 설정 및 API 연결
• Node.js, npm 설치 가이드
• GitHub 연결 및 Vercel 배포

💡 **실습 도움말:**
• 신승반점 프로젝트 관련 질문
• Cursor 프롬프트 작성 도움
• 단계별 실습 가이드

**신승반점 실습에서 어떤 문제가 발생했나요?** 🤔";

pub const RESET_MESSAGE: &str = "채팅이 초기화되었습니다. 새로운 질문을 해주세요!";

const UPDATE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Change notifications for a rendering collaborator
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionUpdate {
    MessageAppended { message: Message },
    StateChanged { loading: bool, mode: InteractionMode },
    Reset,
}

/// Everything the UI renders
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub mode: InteractionMode,
    pub loading: bool,
}

struct Inner {
    state: SessionState,
    context: SessionContext,
    messages: Vec<Message>,
    draft: String,
}

/// One conversation. Cheap to share behind an `Arc`; every method takes
/// `&self`, and no lock is held while a request is in flight.
pub struct ConversationSession {
    router: PromptRouter,
    inner: Mutex<Inner>,
    updates: broadcast::Sender<SessionUpdate>,
}

impl ConversationSession {
    pub fn new(service: Arc<dyn LlmService>, config: &AssistantConfig) -> Self {
        let mut router = PromptRouter::new(service, config.retry, config.code_language.clone());
        if let Some(max) = config.max_output_tokens {
            router = router.with_max_output_tokens(max);
        }
        Self::with_router(router)
    }

    pub fn with_router(router: PromptRouter) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            router,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                context: SessionContext::default(),
                messages: vec![Message::new(Role::Assistant, WELCOME_MESSAGE)],
                draft: String::new(),
            }),
            updates,
        }
    }

    pub fn router(&self) -> &PromptRouter {
        &self.router
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates.subscribe()
    }

    // ------------------------------------------------------------------
    // Inbound from the UI
    // ------------------------------------------------------------------

    /// Send `text` in the current mode and wait for the reply. Blank text is
    /// ignored; a second submission while busy is rejected.
    pub async fn submit(&self, text: &str) -> Result<(), SessionError> {
        let request = self.step(Event::UserSubmit {
            text: text.to_string(),
        })?;
        self.drive(request).await
    }

    /// Submit whatever was set with [`set_input`](Self::set_input)
    pub async fn send_draft(&self) -> Result<(), SessionError> {
        let draft = self.lock().draft.clone();
        self.submit(&draft).await
    }

    pub fn set_input(&self, text: &str) {
        self.lock().draft = text.to_string();
    }

    pub fn input(&self) -> String {
        self.lock().draft.clone()
    }

    /// Code for review or a stack trace; blank clears it
    pub fn set_auxiliary_input(&self, text: &str) {
        self.lock().context.auxiliary = Some(text.to_string()).filter(|t| !t.trim().is_empty());
    }

    pub fn auxiliary_input(&self) -> Option<String> {
        self.lock().context.auxiliary.clone()
    }

    /// Applies to the next request; one already in flight keeps its mode
    pub fn set_mode(&self, mode: InteractionMode) {
        let loading = {
            let mut inner = self.lock();
            inner.context.mode = mode;
            inner.state.is_loading()
        };
        tracing::debug!(%mode, "Mode changed");
        self.publish(SessionUpdate::StateChanged { loading, mode });
    }

    /// Back to the greeting. Mode is kept; a reply still in flight is dropped.
    pub fn reset(&self) {
        // Reset never dispatches and never fails
        if let Err(e) = self.step(Event::Reset) {
            tracing::error!(error = %e, "Reset rejected");
        }
    }

    // ------------------------------------------------------------------
    // Inbound from the error-detection collaborator
    // ------------------------------------------------------------------

    /// Queue a runtime fault and auto-submit it in error mode. While a
    /// request is in flight the fault waits and is submitted as soon as that
    /// request completes; a newer fault replaces a waiting one.
    pub async fn inject_external_error(&self, error: PendingExternalError) -> Result<(), SessionError> {
        tracing::info!(message = %error.message, source = ?error.source, "External error captured");
        {
            let mut inner = self.lock();
            if inner.context.pending_error.replace(error).is_some() {
                tracing::warn!("Replaced an external error that was still waiting");
            }
        }
        let request = self.step(Event::ExternalError)?;
        self.drive(request).await
    }

    /// One-off answer from a standalone route. The auxiliary input goes
    /// along (system information or context) and is kept; history is not
    /// touched. Failures come back already explained.
    pub async fn ask(&self, kind: PromptKind, text: &str) -> String {
        let auxiliary = self.auxiliary_input();
        match self
            .router
            .dispatch_kind(kind, text, auxiliary.as_deref())
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                tracing::error!(?kind, error = %error, "Standalone request failed");
                classify(&error, kind.context_label())
            }
        }
    }

    // ------------------------------------------------------------------
    // Outbound to the UI
    // ------------------------------------------------------------------

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn mode(&self) -> InteractionMode {
        self.lock().context.mode
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading()
    }

    pub fn pending_error(&self) -> Option<PendingExternalError> {
        self.lock().context.pending_error.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            messages: inner.messages.clone(),
            mode: inner.context.mode,
            loading: inner.state.is_loading(),
        }
    }

    // ------------------------------------------------------------------
    // Runtime
    // ------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, update: SessionUpdate) {
        // No subscribers is fine
        let _ = self.updates.send(update);
    }

    /// Run completion requests until the session settles
    async fn drive(&self, mut next: Option<CompletionRequest>) -> Result<(), SessionError> {
        while let Some(req) = next.take() {
            tracing::info!(request = req.request.0, mode = %req.mode, "Dispatching request");
            let outcome = self
                .router
                .dispatch(req.mode, &req.text, req.auxiliary.as_deref())
                .await;
            let event = match outcome {
                Ok(text) => Event::CompletionSucceeded {
                    request: req.request,
                    text,
                },
                Err(error) => {
                    tracing::error!(request = req.request.0, error = %error, kind = ?error.kind, "Request failed");
                    Event::CompletionFailed {
                        request: req.request,
                        error,
                    }
                }
            };
            next = self.step(event)?;
        }
        Ok(())
    }

    /// Apply one event and every effect except the remote call, which is
    /// returned for [`drive`](Self::drive)
    fn step(&self, event: Event) -> Result<Option<CompletionRequest>, SessionError> {
        let mut updates = Vec::new();
        let mut request = None;
        {
            let mut inner = self.lock();
            let result = transition(&inner.state, &inner.context, event)?;

            if result.new_state != inner.state {
                tracing::debug!(from = ?inner.state, to = ?result.new_state, "State transition");
            }
            if let SessionState::AwaitingResponse { request, .. } = result.new_state {
                inner.context.last_request = request;
            }
            inner.state = result.new_state;

            for effect in result.effects {
                match effect {
                    Effect::AppendMessage { role, content } => {
                        let message = Message::new(role, content);
                        inner.messages.push(message.clone());
                        updates.push(SessionUpdate::MessageAppended { message });
                    }
                    Effect::ClearDraft => {
                        inner.draft.clear();
                        inner.context.auxiliary = None;
                    }
                    Effect::ClearInput => inner.draft.clear(),
                    Effect::RequestCompletion(req) => request = Some(req),
                    Effect::ForceMode(mode) => inner.context.mode = mode,
                    Effect::ClearPendingError => inner.context.pending_error = None,
                    Effect::ResetHistory => {
                        inner.messages = vec![Message::new(Role::Assistant, RESET_MESSAGE)];
                        updates.push(SessionUpdate::Reset);
                    }
                    Effect::Notify => updates.push(SessionUpdate::StateChanged {
                        loading: inner.state.is_loading(),
                        mode: inner.context.mode,
                    }),
                }
            }
        }

        for update in updates {
            self.publish(update);
        }
        Ok(request)
    }
}
