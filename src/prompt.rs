//! Prompt routing
//!
//! Picks the route for the current interaction mode, builds the prompt and
//! sends it through the retry executor. Failures are returned as-is; the
//! session decides how to explain them.

mod routes;
mod templates;

pub use routes::{all_routes, route_for, Route};
pub use templates::CODE_INPUT_REQUIRED;

use crate::llm::{LlmError, LlmRequest, LlmService};
use crate::retry::{self, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Interaction style selected in the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    General,
    Error,
    Code,
    Guide,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 4] = [
        InteractionMode::General,
        InteractionMode::Error,
        InteractionMode::Code,
        InteractionMode::Guide,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionMode::General => "general",
            InteractionMode::Error => "error",
            InteractionMode::Code => "code",
            InteractionMode::Guide => "guide",
        }
    }

    pub fn kind(self) -> PromptKind {
        match self {
            InteractionMode::General => PromptKind::General,
            InteractionMode::Error => PromptKind::ErrorAnalysis,
            InteractionMode::Code => PromptKind::CodeReview,
            InteractionMode::Guide => PromptKind::LearningGuide,
        }
    }

    /// Operation label used in failure explanations
    pub fn context_label(self) -> &'static str {
        self.kind().context_label()
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interaction mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for InteractionMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMode(wanted.to_string()))
    }
}

/// Everything a route can build a prompt for. The first four back the
/// interaction modes; the last two are standalone helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    General,
    ErrorAnalysis,
    CodeReview,
    LearningGuide,
    EnvironmentFix,
    PromptOptimization,
}

impl PromptKind {
    pub fn context_label(self) -> &'static str {
        route_for(self).context_label
    }
}

/// Input handed to a route builder
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub text: &'a str,
    /// Code for review, stack trace for error analysis, system info or
    /// context for the helpers. Never blank.
    pub auxiliary: Option<&'a str>,
    pub language: &'a str,
}

/// What a route decided to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPlan {
    /// Call the remote service with this prompt
    Send(String),
    /// Answer locally without a network call
    Reply(String),
}

/// Builds prompts and calls the service with retries
#[derive(Clone)]
pub struct PromptRouter {
    service: Arc<dyn LlmService>,
    policy: RetryPolicy,
    code_language: String,
    max_output_tokens: Option<u32>,
}

impl PromptRouter {
    pub fn new(service: Arc<dyn LlmService>, policy: RetryPolicy, code_language: impl Into<String>) -> Self {
        Self {
            service,
            policy,
            code_language: code_language.into(),
            max_output_tokens: None,
        }
    }

    /// Cap the length of every answer
    #[must_use]
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Build the plan for `kind` without any I/O
    pub fn plan(&self, kind: PromptKind, text: &str, auxiliary: Option<&str>) -> PromptPlan {
        let input = PromptInput {
            text: text.trim(),
            auxiliary: auxiliary.map(str::trim_end).filter(|a| !a.trim().is_empty()),
            language: &self.code_language,
        };
        (route_for(kind).build)(&input)
    }

    pub async fn dispatch(
        &self,
        mode: InteractionMode,
        text: &str,
        auxiliary: Option<&str>,
    ) -> Result<String, LlmError> {
        self.dispatch_kind(mode.kind(), text, auxiliary).await
    }

    pub async fn dispatch_kind(
        &self,
        kind: PromptKind,
        text: &str,
        auxiliary: Option<&str>,
    ) -> Result<String, LlmError> {
        let prompt = match self.plan(kind, text, auxiliary) {
            PromptPlan::Reply(reply) => {
                tracing::debug!(?kind, "Answered locally");
                return Ok(reply);
            }
            PromptPlan::Send(prompt) => prompt,
        };

        tracing::debug!(?kind, model = %self.service.model_id(), "Dispatching prompt");
        let mut request = LlmRequest::new(prompt);
        request.max_output_tokens = self.max_output_tokens;
        let response = retry::execute_with(
            &self.policy,
            || self.service.complete(&request),
            LlmError::is_retryable,
        )
        .await?;

        Ok(response.text())
    }
}
