//! Workspace port - sandboxed file-system subtree for agent output.
//!
//! All paths are relative; implementations must reject any path that
//! resolves outside the workspace root.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::SwarmResult;

/// One entry of a workspace file tree.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub modified: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileEntry>,
}

/// Contents of a read file.
#[derive(Debug, Clone, Serialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
    pub size: u64,
}

/// One content-search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub path: String,
    pub matches: usize,
    /// First match with surrounding context, newlines flattened.
    pub preview: String,
}

/// Trait for workspace implementations.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Identifier of this workspace (scoping key for apply operations).
    fn id(&self) -> &str;

    /// Kind of workspace backing store, e.g. "local" or "github".
    fn kind(&self) -> &'static str;

    /// List files under `subpath` as a tree, bounded by `max_depth`.
    async fn list_files(&self, subpath: &str, max_depth: usize) -> SwarmResult<Vec<FileEntry>>;

    async fn read_file(&self, path: &str) -> SwarmResult<FileContent>;

    /// Write `content` to `path`, creating parent directories as needed.
    async fn write_file(&self, path: &str, content: &str) -> SwarmResult<()>;

    async fn delete_file(&self, path: &str) -> SwarmResult<()>;

    /// Search file contents for a regex `pattern`, restricted to names
    /// matching `glob`, returning at most `max_results` hits.
    async fn search_files(
        &self,
        pattern: &str,
        glob: &str,
        max_results: usize,
    ) -> SwarmResult<Vec<SearchMatch>>;
}
