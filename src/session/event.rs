//! Events that drive the session

use super::state::RequestId;
use crate::llm::LlmError;

#[derive(Debug, Clone)]
pub enum Event {
    // UI events
    UserSubmit {
        text: String,
    },
    /// The pending-error slot was filled
    ExternalError,
    Reset,

    // Completion events
    CompletionSucceeded {
        request: RequestId,
        text: String,
    },
    CompletionFailed {
        request: RequestId,
        error: LlmError,
    },
}
