//! Chat request/response payloads, stream events, and file operations.

use serde::{Deserialize, Serialize};

/// What the request selects to execute: a flat stack by slug, or a workflow
/// graph by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentSelector {
    Stack { slug: String },
    Workflow { id: String },
}

impl Default for AgentSelector {
    fn default() -> Self {
        AgentSelector::Stack {
            slug: "speed-demon".to_string(),
        }
    }
}

/// One chat-equivalent execution request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub selector: AgentSelector,
    /// Workspace to bind for file context and application, by id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    /// Apply extracted file operations to the bound workspace.
    #[serde(default)]
    pub apply_changes: bool,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            selector: AgentSelector::default(),
            workspace_id: None,
            apply_changes: false,
        }
    }
}

/// A discrete file change derived from agent output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum FileOperation {
    Write { path: String, content: String },
    Delete { path: String },
}

impl FileOperation {
    pub fn path(&self) -> &str {
        match self {
            FileOperation::Write { path, .. } | FileOperation::Delete { path } => path,
        }
    }
}

/// Outcome of applying one file operation to a workspace.
///
/// Individual failures never abort sibling operations; callers get the full
/// per-path list.
#[derive(Debug, Clone, Serialize)]
pub struct FileApplyResult {
    pub path: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final response payload of a non-streaming execution.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub message: String,
    /// Label of the last agent that produced output.
    pub agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents_used: Option<Vec<String>>,
    pub artifacts: Vec<FileOperation>,
    pub files_modified: Vec<String>,
    /// Per-operation apply outcomes; empty unless apply was requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_results: Vec<FileApplyResult>,
    pub status: String,
}

/// Events of the streaming execution variant.
///
/// A stream is: one `Status`, zero or more `Chunk`s, zero or more
/// `FileOperation`s, then exactly one terminal event — `Complete` on
/// success, `Error` on failure, never both.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Status {
        status: String,
        agent: String,
    },
    Chunk {
        content: String,
        agent: String,
    },
    FileOperation {
        operation: String,
        path: String,
        agent: String,
    },
    Error {
        message: String,
    },
    Complete {
        agent: String,
        files_modified: Vec<String>,
    },
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete { .. } | StreamEvent::Error { .. })
    }
}
