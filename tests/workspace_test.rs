//! Local workspace behavior against a real temporary directory.

use redstone::domain::ports::Workspace;
use redstone::infrastructure::workspace::LocalWorkspace;
use redstone::SwarmError;

const ONE_MIB: u64 = 1024 * 1024;

fn workspace_in(dir: &tempfile::TempDir) -> LocalWorkspace {
    LocalWorkspace::new("ws", dir.path(), ONE_MIB)
}

#[tokio::test]
async fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let ws = workspace_in(&dir);

    ws.write_file("src/deep/nested.rs", "pub struct Nested;")
        .await
        .unwrap();

    let file = ws.read_file("src/deep/nested.rs").await.unwrap();
    assert_eq!(file.content, "pub struct Nested;");
    assert_eq!(file.path, "src/deep/nested.rs");
}

#[tokio::test]
async fn traversal_and_absolute_paths_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let ws = workspace_in(&dir);

    for path in ["../outside.txt", "a/../../outside.txt", "/etc/hosts"] {
        let err = ws.write_file(path, "x").await.unwrap_err();
        assert!(
            matches!(err, SwarmError::PathTraversal(_)),
            "expected traversal rejection for {path}"
        );
    }
}

#[tokio::test]
async fn read_missing_and_directory_targets() {
    let dir = tempfile::tempdir().unwrap();
    let ws = workspace_in(&dir);
    ws.write_file("sub/file.txt", "x").await.unwrap();

    assert!(matches!(
        ws.read_file("absent.txt").await.unwrap_err(),
        SwarmError::FileNotFound(_)
    ));
    assert!(matches!(
        ws.read_file("sub").await.unwrap_err(),
        SwarmError::NotAFile(_)
    ));
}

#[tokio::test]
async fn oversized_file_refused() {
    let dir = tempfile::tempdir().unwrap();
    let ws = LocalWorkspace::new("ws", dir.path(), 16);

    ws.write_file("big.txt", "this content is longer than sixteen bytes")
        .await
        .unwrap();

    let err = ws.read_file("big.txt").await.unwrap_err();
    assert!(matches!(err, SwarmError::FileTooLarge { max: 16, .. }));
}

#[tokio::test]
async fn listing_skips_hidden_and_vendor_directories() {
    let dir = tempfile::tempdir().unwrap();
    let ws = workspace_in(&dir);

    ws.write_file("visible.txt", "a").await.unwrap();
    ws.write_file("src/main.rs", "fn main() {}").await.unwrap();
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    std::fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
    std::fs::write(dir.path().join(".hidden"), "h").unwrap();

    let entries = ws.list_files("", 3).await.unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

    assert_eq!(names, vec!["src", "visible.txt"]);
    assert!(entries[0].is_dir);
    assert_eq!(entries[0].children[0].name, "main.rs");
}

#[tokio::test]
async fn delete_file_and_missing_delete() {
    let dir = tempfile::tempdir().unwrap();
    let ws = workspace_in(&dir);

    ws.write_file("gone.txt", "x").await.unwrap();
    ws.delete_file("gone.txt").await.unwrap();
    assert!(!dir.path().join("gone.txt").exists());

    assert!(matches!(
        ws.delete_file("gone.txt").await.unwrap_err(),
        SwarmError::FileNotFound(_)
    ));
}

#[tokio::test]
async fn search_matches_with_glob_and_preview() {
    let dir = tempfile::tempdir().unwrap();
    let ws = workspace_in(&dir);

    ws.write_file("src/handler.rs", "fn handle_request() {}\nfn handle_other() {}")
        .await
        .unwrap();
    ws.write_file("notes.md", "handle_request is documented here")
        .await
        .unwrap();

    let hits = ws.search_files("handle_request", "*.rs", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "src/handler.rs");
    assert_eq!(hits[0].matches, 1);
    assert!(hits[0].preview.contains("handle_request"));
    // Previews never contain raw newlines.
    assert!(!hits[0].preview.contains('\n'));
}

#[tokio::test]
async fn search_is_case_insensitive_and_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let ws = workspace_in(&dir);

    for i in 0..5 {
        ws.write_file(&format!("f{i}.txt"), "TOKEN here").await.unwrap();
    }

    let hits = ws.search_files("token", "*", 3).await.unwrap();
    assert_eq!(hits.len(), 3);
}
