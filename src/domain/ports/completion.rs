//! Completion provider port - interface for text-completion backends.

use async_trait::async_trait;

use crate::domain::errors::SwarmResult;

/// One completion call: a persona, a user turn, and generation parameters.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_text: String,
    /// Abstract model identifier; providers translate to a vendor model via
    /// a fixed lookup table, never heuristically.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_text: user_text.into(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Normalized completion output.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
    /// The concrete model the provider actually invoked.
    pub model: String,
}

/// Trait for completion provider implementations.
///
/// One implementation per vendor; exactly one instance is selected at
/// startup from configured credentials. Calls may take seconds — the
/// orchestrator bounds them with a timeout.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name, e.g. "anthropic" or "openai".
    fn name(&self) -> &'static str;

    /// Issue one completion request and return normalized text.
    async fn complete(&self, request: CompletionRequest) -> SwarmResult<CompletionResponse>;
}
