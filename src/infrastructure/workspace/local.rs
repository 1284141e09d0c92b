//! Local directory workspace.
//!
//! A workspace is a sandboxed subtree; every operation takes a relative
//! path and is rejected if it would resolve outside the root. Paths are
//! checked component-wise rather than canonicalized, so writes to files
//! that do not exist yet still validate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::RegexBuilder;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::domain::errors::{SwarmError, SwarmResult};
use crate::domain::ports::{FileContent, FileEntry, SearchMatch, Workspace};

/// Directories never listed or searched.
const SKIPPED_DIRS: &[&str] = &["node_modules", "__pycache__", ".git", "venv", ".venv", "target"];

/// Files larger than this are skipped during content search.
const SEARCH_SIZE_CAP: u64 = 512 * 1024;

/// Characters of context on either side of a search match preview.
const PREVIEW_CONTEXT_CHARS: usize = 50;

/// Workspace backed by a directory on the local filesystem.
pub struct LocalWorkspace {
    id: String,
    root: PathBuf,
    max_read_bytes: u64,
}

impl LocalWorkspace {
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>, max_read_bytes: u64) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
            max_read_bytes,
        }
    }

    /// Create the backing directory if it does not exist.
    pub async fn ensure_exists(&self) -> SwarmResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path against the root, rejecting traversal.
    fn resolve(&self, rel_path: &str) -> SwarmResult<PathBuf> {
        let candidate = Path::new(rel_path);
        if candidate.is_absolute() {
            return Err(SwarmError::PathTraversal(rel_path.to_string()));
        }

        let mut resolved = self.root.clone();
        for component in candidate.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(SwarmError::PathTraversal(rel_path.to_string())),
            }
        }
        Ok(resolved)
    }

    fn should_skip(name: &str) -> bool {
        name.starts_with('.') || SKIPPED_DIRS.contains(&name)
    }

    fn list_recursive(
        &self,
        dir: &Path,
        depth: usize,
        max_depth: usize,
    ) -> SwarmResult<Vec<FileEntry>> {
        if depth > max_depth {
            return Ok(Vec::new());
        }

        let mut names: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .collect();
        names.sort();

        let mut entries = Vec::new();
        for item in names {
            let name = item
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if Self::should_skip(&name) {
                continue;
            }

            let metadata = match item.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };
            let modified: DateTime<Utc> = metadata
                .modified()
                .map(DateTime::from)
                .unwrap_or_else(|_| Utc::now());
            let rel = item
                .strip_prefix(&self.root)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| name.clone());

            let children = if metadata.is_dir() {
                self.list_recursive(&item, depth + 1, max_depth)?
            } else {
                Vec::new()
            };

            entries.push(FileEntry {
                name,
                path: rel,
                is_dir: metadata.is_dir(),
                size: metadata.is_file().then(|| metadata.len()),
                modified,
                children,
            });
        }
        Ok(entries)
    }

    fn collect_files(&self, dir: &Path, paths: &mut Vec<PathBuf>) {
        let Ok(reader) = std::fs::read_dir(dir) else {
            return;
        };
        let mut items: Vec<PathBuf> = reader.filter_map(Result::ok).map(|e| e.path()).collect();
        items.sort();

        for item in items {
            let name = item
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if Self::should_skip(&name) {
                continue;
            }
            if item.is_dir() {
                self.collect_files(&item, paths);
            } else {
                paths.push(item);
            }
        }
    }

    /// Extract a preview around a byte-offset match, clamped to char
    /// boundaries, with newlines flattened to spaces.
    fn match_preview(content: &str, match_start: usize, match_end: usize) -> String {
        let mut start = match_start.saturating_sub(PREVIEW_CONTEXT_CHARS);
        while start > 0 && !content.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = (match_end + PREVIEW_CONTEXT_CHARS).min(content.len());
        while end < content.len() && !content.is_char_boundary(end) {
            end += 1;
        }

        let mut preview = content[start..end].replace('\n', " ");
        if start > 0 {
            preview = format!("...{preview}");
        }
        if end < content.len() {
            preview.push_str("...");
        }
        preview
    }
}

/// Translate a file-name glob (`*` and `?`) to an anchored regex.
fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            c => pattern.push_str(&regex::escape(&c.to_string())),
        }
    }
    pattern.push('$');
    pattern
}

#[async_trait]
impl Workspace for LocalWorkspace {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "local"
    }

    async fn list_files(&self, subpath: &str, max_depth: usize) -> SwarmResult<Vec<FileEntry>> {
        let target = self.resolve(subpath)?;
        if !target.exists() {
            return Ok(Vec::new());
        }
        self.list_recursive(&target, 0, max_depth)
    }

    async fn read_file(&self, path: &str) -> SwarmResult<FileContent> {
        let file_path = self.resolve(path)?;
        if !file_path.exists() {
            return Err(SwarmError::FileNotFound(path.to_string()));
        }
        if !file_path.is_file() {
            return Err(SwarmError::NotAFile(path.to_string()));
        }

        let size = tokio::fs::metadata(&file_path).await?.len();
        if size > self.max_read_bytes {
            return Err(SwarmError::FileTooLarge {
                path: path.to_string(),
                size,
                max: self.max_read_bytes,
            });
        }

        let content = tokio::fs::read_to_string(&file_path).await?;
        Ok(FileContent {
            path: path.to_string(),
            size: content.len() as u64,
            content,
        })
    }

    async fn write_file(&self, path: &str, content: &str) -> SwarmResult<()> {
        let file_path = self.resolve(path)?;
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file_path, content).await?;
        debug!(workspace = %self.id, path, bytes = content.len(), "wrote file");
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> SwarmResult<()> {
        let file_path = self.resolve(path)?;
        if !file_path.exists() {
            return Err(SwarmError::FileNotFound(path.to_string()));
        }
        if file_path.is_dir() {
            tokio::fs::remove_dir_all(&file_path).await?;
        } else {
            tokio::fs::remove_file(&file_path).await?;
        }
        debug!(workspace = %self.id, path, "deleted");
        Ok(())
    }

    async fn search_files(
        &self,
        pattern: &str,
        glob: &str,
        max_results: usize,
    ) -> SwarmResult<Vec<SearchMatch>> {
        let content_regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                SwarmError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("invalid search pattern: {e}"),
                ))
            })?;
        let name_regex = RegexBuilder::new(&glob_to_regex(glob))
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                SwarmError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("invalid file glob: {e}"),
                ))
            })?;

        let mut candidates = Vec::new();
        self.collect_files(&self.root, &mut candidates);

        let mut results = Vec::new();
        for file_path in candidates {
            if results.len() >= max_results {
                break;
            }

            let name = file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !name_regex.is_match(&name) {
                continue;
            }

            let Ok(metadata) = file_path.metadata() else {
                continue;
            };
            if metadata.len() > SEARCH_SIZE_CAP {
                continue;
            }

            // Binary files fail UTF-8 decoding and are skipped.
            let Ok(content) = std::fs::read_to_string(&file_path) else {
                continue;
            };

            let matches: Vec<_> = content_regex.find_iter(&content).collect();
            if let Some(first) = matches.first() {
                let rel = file_path
                    .strip_prefix(&self.root)
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_else(|_| name.clone());
                results.push(SearchMatch {
                    path: rel,
                    matches: matches.len(),
                    preview: Self::match_preview(&content, first.start(), first.end()),
                });
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_rejected() {
        let ws = LocalWorkspace::new("w1", "/tmp/ws", 1024);
        assert!(matches!(
            ws.resolve("/etc/passwd"),
            Err(SwarmError::PathTraversal(_))
        ));
    }

    #[test]
    fn parent_escapes_rejected() {
        let ws = LocalWorkspace::new("w1", "/tmp/ws", 1024);
        assert!(matches!(
            ws.resolve("../outside.txt"),
            Err(SwarmError::PathTraversal(_))
        ));
        assert!(matches!(
            ws.resolve("src/../../outside.txt"),
            Err(SwarmError::PathTraversal(_))
        ));
    }

    #[test]
    fn normal_paths_resolve_under_root() {
        let ws = LocalWorkspace::new("w1", "/tmp/ws", 1024);
        let resolved = ws.resolve("src/./main.rs").unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/ws/src/main.rs"));
    }

    #[test]
    fn glob_translation() {
        assert_eq!(glob_to_regex("*.rs"), "^.*\\.rs$");
        assert_eq!(glob_to_regex("file?.txt"), "^file.\\.txt$");
    }

    #[test]
    fn preview_flattens_newlines_and_marks_truncation() {
        let content = "x".repeat(100) + "needle" + &"y".repeat(100);
        let preview = LocalWorkspace::match_preview(&content, 100, 106);
        assert!(preview.starts_with("..."));
        assert!(preview.ends_with("..."));
        assert!(preview.contains("needle"));
    }
}
