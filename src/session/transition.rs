//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result. All I/O happens in the session runtime that executes the effects.

use super::effect::CompletionRequest;
use super::state::{PendingExternalError, SessionContext, SessionState};
use super::{Effect, Event};
use crate::classify::classify;
use crate::prompt::InteractionMode;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// Nothing changes
    pub fn unchanged(state: &SessionState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    fn prepend(mut self, effect: Effect) -> Self {
        self.effects.insert(0, effect);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A request is already in flight, wait for the reply before sending another message")]
    Busy,
}

pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Blank input never reaches the router, busy or not
        (_, Event::UserSubmit { text }) if text.trim().is_empty() => {
            Ok(TransitionResult::unchanged(state))
        }

        (SessionState::Idle, Event::UserSubmit { text }) => {
            let text = text.trim().to_string();
            let request = context.last_request.next();
            let mode = context.mode;
            Ok(
                TransitionResult::new(SessionState::AwaitingResponse { request, mode })
                    .with_effect(Effect::ClearDraft)
                    .with_effect(Effect::user_message(text.clone()))
                    .with_effect(Effect::RequestCompletion(CompletionRequest {
                        request,
                        mode,
                        text,
                        auxiliary: context.auxiliary.clone(),
                    }))
                    .with_effect(Effect::Notify),
            )
        }

        (SessionState::AwaitingResponse { .. }, Event::UserSubmit { .. }) => {
            Err(TransitionError::Busy)
        }

        (SessionState::Idle, Event::ExternalError) => match &context.pending_error {
            Some(pending) => Ok(dispatch_external(context, pending)),
            None => Ok(TransitionResult::unchanged(state)),
        },

        // Stays in the slot until the in-flight request completes
        (SessionState::AwaitingResponse { .. }, Event::ExternalError) => {
            Ok(TransitionResult::unchanged(state))
        }

        (
            SessionState::AwaitingResponse { request, .. },
            Event::CompletionSucceeded {
                request: completed,
                text,
            },
        ) if *request == completed => Ok(complete(context, Effect::assistant_message(text))),

        (
            SessionState::AwaitingResponse { request, mode },
            Event::CompletionFailed {
                request: completed,
                error,
            },
        ) if *request == completed => {
            let explanation = classify(&error, mode.context_label());
            Ok(complete(context, Effect::assistant_message(explanation)))
        }

        // Late result from a request that was reset away
        (_, Event::CompletionSucceeded { .. } | Event::CompletionFailed { .. }) => {
            Ok(TransitionResult::unchanged(state))
        }

        (_, Event::Reset) => Ok(TransitionResult::new(SessionState::Idle)
            .with_effect(Effect::ResetHistory)
            .with_effect(Effect::ClearPendingError)
            .with_effect(Effect::Notify)),
    }
}

/// Append the reply and go idle, or straight into the queued external error
fn complete(context: &SessionContext, reply: Effect) -> TransitionResult {
    match &context.pending_error {
        Some(pending) => dispatch_external(context, pending).prepend(reply),
        None => TransitionResult::new(SessionState::Idle)
            .with_effect(reply)
            .with_effect(Effect::Notify),
    }
}

fn dispatch_external(context: &SessionContext, pending: &PendingExternalError) -> TransitionResult {
    let request = context.last_request.next();
    let mode = InteractionMode::Error;
    TransitionResult::new(SessionState::AwaitingResponse { request, mode }).with_effects([
        Effect::ForceMode(mode),
        Effect::ClearInput,
        Effect::user_message(pending.user_text()),
        Effect::ClearPendingError,
        Effect::RequestCompletion(CompletionRequest {
            request,
            mode,
            text: pending.message.clone(),
            auxiliary: pending
                .stack
                .clone()
                .filter(|stack| !stack.trim().is_empty()),
        }),
        Effect::Notify,
    ])
}
