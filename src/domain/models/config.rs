//! Engine configuration, loaded via the figment-based loader in
//! `infrastructure::config`.

use serde::{Deserialize, Serialize};

/// Main configuration structure for the Redstone engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Completion provider credentials and tuning.
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Workspace sandbox configuration.
    #[serde(default)]
    pub workspaces: WorkspacesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            logging: LoggingConfig::default(),
            workspaces: WorkspacesConfig::default(),
        }
    }
}

/// Completion provider configuration.
///
/// Exactly one provider is selected per deployment, by credential priority
/// (anthropic first, then openai).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProvidersConfig {
    /// Anthropic API key; falls back to `ANTHROPIC_API_KEY` when empty.
    #[serde(default)]
    pub anthropic_api_key: String,

    /// OpenAI API key; falls back to `OPENAI_API_KEY` when empty.
    #[serde(default)]
    pub openai_api_key: String,

    /// Model used when neither the agent nor the workflow specifies one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Max tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-call timeout enforced by the orchestrator, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

const fn default_max_tokens() -> u32 {
    4096
}

const fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: String::new(),
            openai_api_key: String::new(),
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProvidersConfig {
    /// Anthropic key from config or the conventional environment variable.
    pub fn anthropic_key(&self) -> Option<String> {
        non_empty(&self.anthropic_api_key)
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok().and_then(|k| non_empty(&k)))
    }

    /// OpenAI key from config or the conventional environment variable.
    pub fn openai_key(&self) -> Option<String> {
        non_empty(&self.openai_api_key)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().and_then(|k| non_empty(&k)))
    }

    /// Whether any completion provider credential is available.
    pub fn any_key_configured(&self) -> bool {
        self.anthropic_key().is_some() || self.openai_key().is_some()
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Workspace sandbox configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkspacesConfig {
    /// Root directory under which workspace subtrees live.
    #[serde(default = "default_workspaces_root")]
    pub root: String,

    /// Maximum readable file size in bytes.
    #[serde(default = "default_max_read_bytes")]
    pub max_read_bytes: u64,
}

fn default_workspaces_root() -> String {
    ".redstone/workspaces".to_string()
}

const fn default_max_read_bytes() -> u64 {
    1024 * 1024
}

impl Default for WorkspacesConfig {
    fn default() -> Self {
        Self {
            root: default_workspaces_root(),
            max_read_bytes: default_max_read_bytes(),
        }
    }
}
