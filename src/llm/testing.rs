//! Scripted LLM service for tests
//!
//! Returns queued results in order and records every request it receives.

use super::{LlmError, LlmRequest, LlmResponse, LlmService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted service: queued results first, then the fallback (if any),
/// otherwise a network error.
pub struct ScriptedService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    fallback: Mutex<Option<Result<LlmResponse, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A service whose every call fails with `error`
    pub fn always_failing(error: LlmError) -> Self {
        let service = Self::new();
        *service.fallback.lock().unwrap() = Some(Err(error));
        service
    }

    /// A service whose every call answers `text`
    pub fn always_answering(text: &str) -> Self {
        let service = Self::new();
        *service.fallback.lock().unwrap() = Some(Ok(LlmResponse::text_only(text)));
        service
    }

    pub fn queue_text(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(LlmResponse::text_only(text)));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    /// Full requests received so far, in call order
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmService for ScriptedService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(next) = self.responses.lock().unwrap().pop_front() {
            return next;
        }
        self.fallback
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(LlmError::network("network error: no scripted response queued")))
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}
