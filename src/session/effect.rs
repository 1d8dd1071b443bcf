//! Effects produced by state transitions

use super::state::{RequestId, Role};
use crate::prompt::InteractionMode;

/// A request for the prompt router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub request: RequestId,
    pub mode: InteractionMode,
    pub text: String,
    pub auxiliary: Option<String>,
}

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the history
    AppendMessage { role: Role, content: String },

    /// Clear the draft and auxiliary inputs
    ClearDraft,

    /// Clear the draft only
    ClearInput,

    /// Dispatch through the prompt router
    RequestCompletion(CompletionRequest),

    ForceMode(InteractionMode),

    ClearPendingError,

    /// Replace the history with the greeting
    ResetHistory,

    /// Publish the current loading flag and mode
    Notify,
}

impl Effect {
    pub fn user_message(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant_message(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
