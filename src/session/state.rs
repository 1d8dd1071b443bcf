//! Session state types

use crate::prompt::InteractionMode;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One chat entry. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Runtime fault reported by the host environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingExternalError {
    pub message: String,
    pub stack: Option<String>,
    pub source: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PendingExternalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
            source: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Text shown as the user's message when the error is auto-submitted
    pub fn user_text(&self) -> String {
        format!(
            "자동 감지된 오류:\n\n{}\n\n소스: {}\n시간: {}",
            self.message,
            self.source.as_deref().unwrap_or("Unknown"),
            self.timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// Identifies one dispatched request so late completions can be told apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub fn next(self) -> Self {
        RequestId(self.0.wrapping_add(1))
    }
}

/// Where the session is in its request cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingResponse {
        request: RequestId,
        /// Mode the request was dispatched with
        mode: InteractionMode,
    },
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::AwaitingResponse { .. })
    }
}

/// Inputs the transition function reads besides the state itself
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub mode: InteractionMode,
    /// Code for review or stack trace, set by the UI. Never blank.
    pub auxiliary: Option<String>,
    /// At most one; consumed when the session is idle
    pub pending_error: Option<PendingExternalError>,
    /// Last request handed out
    pub last_request: RequestId,
}
