//! Anthropic completion provider.
//!
//! Calls the Messages API directly over HTTP. Generic model identifiers are
//! translated to the nearest Claude model by a fixed lookup table, never
//! heuristically.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::ports::{CompletionProvider, CompletionRequest, CompletionResponse};

/// Generic identifier → Claude model, fixed table.
const MODEL_MAP: &[(&str, &str)] = &[
    ("gpt-4", "claude-3-5-sonnet-20241022"),
    ("gpt-4o", "claude-3-5-sonnet-20241022"),
    ("gpt-4o-mini", "claude-3-haiku-20240307"),
    ("gpt-3.5-turbo", "claude-3-haiku-20240307"),
];

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    /// Base URL, overridable for tests and proxies.
    pub base_url: String,
    /// HTTP-level timeout; the orchestrator applies its own bound on top.
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout_secs: 300,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    http_client: ReqwestClient,
    config: AnthropicConfig,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> SwarmResult<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| SwarmError::Provider {
                provider: "anthropic".to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Translate a generic model identifier to a Claude model.
    fn translate_model(model: &str) -> &str {
        MODEL_MAP
            .iter()
            .find(|(generic, _)| *generic == model)
            .map_or(model, |(_, claude)| *claude)
    }

    fn provider_error(message: impl Into<String>) -> SwarmError {
        SwarmError::Provider {
            provider: "anthropic".to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, request: CompletionRequest) -> SwarmResult<CompletionResponse> {
        let model = Self::translate_model(&request.model).to_string();
        debug!(model = %model, "sending Anthropic messages request");

        let body = MessagesRequest {
            model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt,
            messages: vec![Message {
                role: "user",
                content: request.user_text,
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(Self::provider_error(format!("HTTP {status}: {detail}")));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("malformed response: {e}")))?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();

        Ok(CompletionResponse {
            text,
            model: parsed.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_models_map_to_claude() {
        assert_eq!(
            AnthropicProvider::translate_model("gpt-4o"),
            "claude-3-5-sonnet-20241022"
        );
        assert_eq!(
            AnthropicProvider::translate_model("gpt-4o-mini"),
            "claude-3-haiku-20240307"
        );
    }

    #[test]
    fn claude_models_pass_through() {
        assert_eq!(
            AnthropicProvider::translate_model("claude-3-opus-20240229"),
            "claude-3-opus-20240229"
        );
    }
}
