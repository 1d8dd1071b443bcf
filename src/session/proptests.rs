//! Property-based tests for the session transition function
//!
//! Events are fed through `transition` and the effects applied to a small
//! in-memory model, the way the runtime would.

use super::effect::CompletionRequest;
use super::state::*;
use super::transition::*;
use super::*;
use crate::llm::LlmError;
use crate::prompt::InteractionMode;
use proptest::prelude::*;

// ============================================================================
// Model
// ============================================================================

#[derive(Default)]
struct Model {
    state: SessionState,
    context: SessionContext,
    /// Roles only; the greeting counts as one assistant message
    history: Vec<Role>,
    dispatched: Vec<CompletionRequest>,
}

impl Model {
    fn new() -> Self {
        Self {
            history: vec![Role::Assistant],
            ..Default::default()
        }
    }

    fn apply(&mut self, result: TransitionResult) {
        self.state = result.new_state;
        if let SessionState::AwaitingResponse { request, .. } = self.state {
            self.context.last_request = request;
        }
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { role, .. } => self.history.push(role),
                Effect::ClearDraft => self.context.auxiliary = None,
                Effect::ClearInput => {}
                Effect::RequestCompletion(req) => self.dispatched.push(req),
                Effect::ForceMode(mode) => self.context.mode = mode,
                Effect::ClearPendingError => self.context.pending_error = None,
                Effect::ResetHistory => self.history = vec![Role::Assistant],
                Effect::Notify => {}
            }
        }
    }

    fn in_flight(&self) -> Option<RequestId> {
        match self.state {
            SessionState::AwaitingResponse { request, .. } => Some(request),
            SessionState::Idle => None,
        }
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    Submit(String),
    SetMode(InteractionMode),
    Inject(String),
    Succeed,
    Fail(String),
    /// Completion for a request id that is not in flight
    Stale,
    Reset,
}

fn arb_mode() -> impl Strategy<Value = InteractionMode> {
    prop_oneof![
        Just(InteractionMode::General),
        Just(InteractionMode::Error),
        Just(InteractionMode::Code),
        Just(InteractionMode::Guide),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => "[ a-z]{0,12}".prop_map(Step::Submit),
        1 => arb_mode().prop_map(Step::SetMode),
        1 => "[a-zA-Z ]{1,20}".prop_map(Step::Inject),
        3 => Just(Step::Succeed),
        2 => prop_oneof![
            Just("Quota exceeded".to_string()),
            Just("Failed to fetch".to_string()),
            Just("unauthorized".to_string()),
            "[a-z ]{0,12}",
        ]
        .prop_map(Step::Fail),
        1 => Just(Step::Stale),
        1 => Just(Step::Reset),
    ]
}

/// Build the event for a step, or `None` when it only touches the context
fn event_for(model: &mut Model, step: Step) -> Option<Event> {
    match step {
        Step::Submit(text) => Some(Event::UserSubmit { text }),
        Step::SetMode(mode) => {
            model.context.mode = mode;
            None
        }
        Step::Inject(message) => {
            model.context.pending_error = Some(PendingExternalError::new(message));
            Some(Event::ExternalError)
        }
        Step::Succeed => model.in_flight().map(|request| Event::CompletionSucceeded {
            request,
            text: "ok".into(),
        }),
        Step::Fail(message) => model.in_flight().map(|request| Event::CompletionFailed {
            request,
            error: LlmError::unknown(message),
        }),
        Step::Stale => Some(Event::CompletionSucceeded {
            request: model.context.last_request.next().next(),
            text: "late".into(),
        }),
        Step::Reset => Some(Event::Reset),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_session_invariants(steps in prop::collection::vec(arb_step(), 1..40)) {
        let mut model = Model::new();

        for step in steps {
            let was_busy = model.state.is_loading();
            let Some(event) = event_for(&mut model, step) else { continue };
            let is_submit = matches!(&event, Event::UserSubmit { text } if !text.trim().is_empty());
            let is_reset = matches!(event, Event::Reset);

            match transition(&model.state, &model.context, event) {
                Err(TransitionError::Busy) => {
                    prop_assert!(was_busy && is_submit, "only non-blank submits while busy are rejected");
                }
                Ok(result) => {
                    let new_requests: Vec<_> = result
                        .effects
                        .iter()
                        .filter(|e| matches!(e, Effect::RequestCompletion(_)))
                        .collect();
                    prop_assert!(new_requests.len() <= 1, "single flight");
                    if let Some(Effect::RequestCompletion(req)) = new_requests.first() {
                        prop_assert!(req.request > model.context.last_request);
                        prop_assert_eq!(
                            &result.new_state,
                            &SessionState::AwaitingResponse { request: req.request, mode: req.mode }
                        );
                    }
                    model.apply(result);
                }
            }

            if is_reset {
                prop_assert_eq!(model.history.len(), 1);
                prop_assert!(model.context.pending_error.is_none());
            }
        }

        // Every dispatch appended exactly one user message, minus those wiped by reset
        let users = model.history.iter().filter(|r| **r == Role::User).count();
        prop_assert!(users <= model.dispatched.len());
        // A pending error survives only while a request is in flight
        if model.context.pending_error.is_some() {
            prop_assert!(model.state.is_loading());
        }
    }

    #[test]
    fn prop_reply_follows_each_user_message(texts in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        let mut model = Model::new();
        for text in texts {
            let result = transition(&model.state, &model.context, Event::UserSubmit { text }).unwrap();
            model.apply(result);
            let request = model.in_flight().unwrap();
            let result = transition(
                &model.state,
                &model.context,
                Event::CompletionSucceeded { request, text: "ok".into() },
            )
            .unwrap();
            model.apply(result);
            prop_assert_eq!(&model.state, &SessionState::Idle);
        }
        let roles: Vec<_> = model.history.iter().skip(1).copied().collect();
        for pair in roles.chunks(2) {
            prop_assert_eq!(pair, &[Role::User, Role::Assistant][..]);
        }
    }
}
