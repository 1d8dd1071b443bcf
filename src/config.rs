//! Assistant configuration, read from the environment
//!
//! | Variable | Default |
//! |---|---|
//! | `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) | unset: calls fail with an auth explanation |
//! | `GEMINI_MODEL` | `gemini-2.5-flash` |
//! | `GEMINI_BASE_URL` | public endpoint |
//! | `ASSISTANT_MAX_ATTEMPTS` | 3 |
//! | `ASSISTANT_BASE_DELAY_MS` | 1000 |
//! | `ASSISTANT_REQUEST_TIMEOUT_SECS` | 60 |
//! | `ASSISTANT_CODE_LANGUAGE` | `javascript` |
//! | `ASSISTANT_MAX_OUTPUT_TOKENS` | unset: no cap |

use crate::llm::GeminiModel;
use crate::retry::RetryPolicy;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// Configuration for the remote service. Read-only once built; safe to
/// share between sessions.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: GeminiModel,
    /// Overrides the public endpoint (proxies, gateways)
    pub base_url: Option<String>,
    /// Hard limit for one attempt; expiry surfaces as a network failure
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GeminiModel::default(),
            base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Everything a session needs besides the service handle
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub llm: LlmConfig,
    pub retry: RetryPolicy,
    /// Language tag used for code-review prompts
    pub code_language: String,
    /// Answer length cap sent with every request; unset leaves it to the model
    pub max_output_tokens: Option<u32>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            retry: RetryPolicy::default(),
            code_language: DEFAULT_CODE_LANGUAGE.to_string(),
            max_output_tokens: None,
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Bad values fall back to defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model = match get("GEMINI_MODEL") {
            Some(name) => GeminiModel::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(model = %name, "Unknown GEMINI_MODEL, using default");
                GeminiModel::default()
            }),
            None => GeminiModel::default(),
        };

        let defaults = RetryPolicy::default();
        let max_attempts = parse_or(&get, "ASSISTANT_MAX_ATTEMPTS", defaults.max_attempts());
        let base_delay_ms = parse_or(
            &get,
            "ASSISTANT_BASE_DELAY_MS",
            u64::try_from(defaults.base_delay().as_millis()).unwrap_or(1000),
        );
        let retry = RetryPolicy::new(max_attempts, Duration::from_millis(base_delay_ms))
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid retry settings, using defaults");
                defaults
            });

        let timeout_secs = parse_or(
            &get,
            "ASSISTANT_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
        );

        Self {
            llm: LlmConfig {
                api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
                model,
                base_url: get("GEMINI_BASE_URL"),
                request_timeout: Duration::from_secs(timeout_secs.max(1)),
            },
            retry,
            max_output_tokens: get("ASSISTANT_MAX_OUTPUT_TOKENS").and_then(|raw| {
                match raw.trim().parse::<u32>() {
                    Ok(max) if max > 0 => Some(max),
                    _ => {
                        tracing::warn!(value = %raw, "Invalid ASSISTANT_MAX_OUTPUT_TOKENS, sending no cap");
                        None
                    }
                }
            }),
            code_language: get("ASSISTANT_CODE_LANGUAGE")
                .map_or_else(|| DEFAULT_CODE_LANGUAGE.to_string(), |l| l.trim().to_string()),
        }
    }
}

fn parse_or<T: FromStr + Copy>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparsable setting, using default");
            default
        }),
        None => default,
    }
}
