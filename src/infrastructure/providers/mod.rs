//! Completion provider implementations.

pub mod anthropic;
pub mod mock;
pub mod openai;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use mock::MockProvider;
pub use openai::{OpenAiConfig, OpenAiProvider};

use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::models::Config;
use crate::domain::ports::CompletionProvider;

/// Select the completion provider from configured credentials.
///
/// Checked in priority order: Anthropic first, then OpenAI. Exactly one
/// provider is selected for the lifetime of the process; there is no
/// per-request fallback between vendors.
pub fn select_provider(config: &Config) -> SwarmResult<Arc<dyn CompletionProvider>> {
    if let Some(key) = config.providers.anthropic_key() {
        info!(provider = "anthropic", "completion provider selected");
        let mut provider_config = AnthropicConfig::new(key);
        provider_config.timeout_secs = config.providers.timeout_secs;
        return Ok(Arc::new(AnthropicProvider::new(provider_config)?));
    }

    if let Some(key) = config.providers.openai_key() {
        info!(provider = "openai", "completion provider selected");
        let mut provider_config = OpenAiConfig::new(key);
        provider_config.timeout_secs = config.providers.timeout_secs;
        return Ok(Arc::new(OpenAiProvider::new(provider_config)?));
    }

    Err(SwarmError::ProviderNotConfigured)
}
