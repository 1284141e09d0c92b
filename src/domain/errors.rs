//! Domain errors for the Redstone swarm engine.

use thiserror::Error;

/// Render the unreached node ids of a cyclic graph: `a, b, c`.
fn format_node_list(ids: &[String]) -> String {
    ids.join(", ")
}

/// Errors that can occur while compiling or executing an agent workflow.
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("Workflow must have at least one agent")]
    EmptyWorkflow,

    #[error("Duplicate agent node id: {0}")]
    DuplicateNodeId(String),

    #[error("Edge {from} -> {to} references unknown agent node: {missing}")]
    UnknownEdgeEndpoint {
        from: String,
        to: String,
        missing: String,
    },

    #[error("Workflow contains a cycle; unreached agents: {}", format_node_list(.unreached))]
    CycleDetected { unreached: Vec<String> },

    #[error("No completion provider configured: set an Anthropic or OpenAI API key")]
    ProviderNotConfigured,

    #[error("Completion provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Completion call timed out after {0} seconds")]
    Timeout(u64),

    #[error("Path escapes the workspace root: {0}")]
    PathTraversal(String),

    #[error("File too large: {path} is {size} bytes (max {max})")]
    FileTooLarge { path: String, size: u64, max: u64 },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("Stack not found: {0}")]
    StackNotFound(String),

    #[error("Invalid workflow YAML: {0}")]
    InvalidYaml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SwarmResult<T> = Result<T, SwarmError>;

impl From<serde_yaml::Error> for SwarmError {
    fn from(err: serde_yaml::Error) -> Self {
        SwarmError::InvalidYaml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_error_lists_unreached_nodes() {
        let err = SwarmError::CycleDetected {
            unreached: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "Workflow contains a cycle; unreached agents: a, b"
        );
    }
}
