//! File-operation extractor: turns fenced code blocks with path markers in
//! free-form agent output into structured write operations.
//!
//! A block is recognized when the first line after the opening fence is a
//! comment-style path marker (`# path`, `// path`, `-- path`, or
//! `<!-- path -->`). Blocks without a marker are prose, not file content.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::models::FileOperation;

/// Fenced block whose first inner line is a comment-style path marker.
/// Group 1/2: the path (one of the marker alternatives); group 3: content.
const BLOCK_PATTERN: &str = r"(?s)```[A-Za-z0-9_+.\-]*[ \t]*\n(?:(?:#|//|--)[ \t]+(\S+)[ \t]*\n|<!--[ \t]*(\S+)[ \t]*-->[ \t]*\n)(.*?)```";

fn block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(BLOCK_PATTERN).expect("extractor pattern is valid"))
}

/// Extract file write operations from agent output text.
///
/// Purely textual and order-preserving: later blocks for the same path are
/// appended, not merged — the consumer applies them in emitted order, so
/// last-write-wins.
pub fn extract_operations(output: &str) -> Vec<FileOperation> {
    block_regex()
        .captures_iter(output)
        .filter_map(|caps| {
            let path = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())?;
            let content = caps.get(3).map(|m| m.as_str().to_string())?;
            Some(FileOperation::Write { path, content })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_block_yields_write() {
        let output = "Here is the file:\n```python\n# src/app.py\nprint('hi')\n```\n";
        let ops = extract_operations(output);
        assert_eq!(
            ops,
            vec![FileOperation::Write {
                path: "src/app.py".into(),
                content: "print('hi')\n".into(),
            }]
        );
    }

    #[test]
    fn two_distinct_paths_yield_two_writes() {
        let output = "\
```rust\n// src/lib.rs\npub fn a() {}\n```\n\
Some prose.\n\
```html\n<!-- index.html -->\n<html></html>\n```\n";
        let ops = extract_operations(output);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].path(), "src/lib.rs");
        assert_eq!(ops[1].path(), "index.html");
        match &ops[1] {
            FileOperation::Write { content, .. } => assert_eq!(content, "<html></html>\n"),
            FileOperation::Delete { .. } => panic!("expected write"),
        }
    }

    #[test]
    fn unmarked_block_is_prose() {
        let output = "```python\nprint('no path marker')\n```";
        assert!(extract_operations(output).is_empty());
    }

    #[test]
    fn fence_without_language_tag() {
        let output = "```\n# notes.txt\nremember this\n```";
        let ops = extract_operations(output);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].path(), "notes.txt");
    }

    #[test]
    fn repeated_path_appends_both() {
        let output = "\
```\n# config.yaml\nversion: 1\n```\n\
```\n# config.yaml\nversion: 2\n```\n";
        let ops = extract_operations(output);
        assert_eq!(ops.len(), 2);
        match (&ops[0], &ops[1]) {
            (
                FileOperation::Write { content: first, .. },
                FileOperation::Write { content: second, .. },
            ) => {
                assert_eq!(first, "version: 1\n");
                assert_eq!(second, "version: 2\n");
            }
            _ => panic!("expected two writes"),
        }
    }

    #[test]
    fn sql_style_marker() {
        let output = "```sql\n-- migrations/001.sql\nCREATE TABLE t (id INT);\n```";
        let ops = extract_operations(output);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].path(), "migrations/001.sql");
    }

    #[test]
    fn extraction_is_idempotent() {
        let output = "```python\n# a.py\nx = 1\n```";
        let first = extract_operations(output);
        let second = extract_operations(output);
        assert_eq!(first, second);
    }
}
