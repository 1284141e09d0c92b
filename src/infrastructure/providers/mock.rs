//! Mock completion provider for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::ports::{CompletionProvider, CompletionRequest, CompletionResponse};

enum ScriptedCompletion {
    Success(String),
    Failure(String),
}

/// Mock provider that replays a scripted sequence of completions.
///
/// Each call to `complete` consumes the next scripted entry; once the script
/// is exhausted, the default text is returned. All received requests are
/// recorded for assertion.
pub struct MockProvider {
    script: Mutex<VecDeque<ScriptedCompletion>>,
    default_text: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_text: "mock response".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    /// Queue a successful completion with the given text.
    pub async fn push_response(&self, text: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(ScriptedCompletion::Success(text.into()));
    }

    /// Queue a failure with the given error message.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(ScriptedCompletion::Failure(message.into()));
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> SwarmResult<CompletionResponse> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        match self.script.lock().await.pop_front() {
            Some(ScriptedCompletion::Success(text)) => Ok(CompletionResponse { text, model }),
            Some(ScriptedCompletion::Failure(message)) => Err(SwarmError::Provider {
                provider: "mock".to_string(),
                message,
            }),
            None => Ok(CompletionResponse {
                text: self.default_text.clone(),
                model,
            }),
        }
    }
}
