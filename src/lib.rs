//! Assistant interaction engine for the landing-page practice tutorial
//!
//! Turns a user message, or a runtime error reported by the host page, into
//! a routed, retried and failure-classified request to the generative
//! language service, and keeps the conversation the UI renders.
//!
//! ```text
//! UI / error hook -> ConversationSession -> PromptRouter -> retry::execute_with -> LlmService
//!                          ^                                                          |
//!                          +------ reply, or classify(failure) explanation -----------+
//! ```

pub mod classify;
pub mod config;
pub mod llm;
pub mod prompt;
pub mod retry;
pub mod session;

pub use classify::{classify, classify_message, FailureKind};
pub use config::{AssistantConfig, LlmConfig};
pub use prompt::{InteractionMode, PromptKind, PromptRouter};
pub use retry::RetryPolicy;
pub use session::{
    ConversationSession, Message, PendingExternalError, Role, SessionError, SessionSnapshot,
    SessionUpdate,
};
