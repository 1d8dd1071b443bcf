//! Common types for LLM interactions

/// LLM request: the fully composed prompt, sent as a single user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmRequest {
    pub prompt: String,
    pub max_output_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens: None,
        }
    }

    #[must_use]
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// LLM response
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub parts: Vec<String>,
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

impl LlmResponse {
    /// Convenience constructor for a single-part text response
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
            finish_reason: Some("STOP".to_string()),
            usage: Usage::default(),
        }
    }

    /// Get text content from the response
    pub fn text(&self) -> String {
        self.parts.concat()
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_joins_parts() {
        let response = LlmResponse {
            parts: vec!["Hello, ".to_string(), "world".to_string()],
            finish_reason: None,
            usage: Usage::default(),
        };
        assert_eq!(response.text(), "Hello, world");
    }
}
