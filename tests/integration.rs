use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn ma_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ma"))
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let archive = root.join("archive");
    fs::create_dir_all(archive.join("notes")).unwrap();
    fs::create_dir_all(archive.join("images")).unwrap();
    fs::write(
        archive.join("notes/readme.md"),
        "# Hello\n\nThis archive holds notes about Rust programming.\n",
    )
    .unwrap();
    fs::write(
        archive.join("notes/todo.txt"),
        "Things to do\n\n- water the plants\n- deploy the server\n",
    )
    .unwrap();
    fs::write(
        archive.join("images/logo.png"),
        [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
    )
    .unwrap();
    fs::write(archive.join("index.html"), "<p>front page</p>").unwrap();

    let config_content = format!(
        r#"[archive]
root = "{}/archive"

[server]
bind = "127.0.0.1:7400"
"#,
        root.display()
    );

    let config_path = config_dir.join("archive.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_ma(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = ma_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run ma binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_files_lists_everything() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_ma(&config_path, &["files"]);
    assert!(success, "files failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("notes/readme.md"));
    assert!(stdout.contains("notes/todo.txt"));
    assert!(stdout.contains("images/logo.png"));
    assert!(stdout.contains("index.html"));
    assert!(stdout.contains("ROOT"));
    assert!(stdout.contains("4 files"));
}

#[test]
fn test_search_empty_query_lists_all() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_ma(&config_path, &["search"]);
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("4. "), "Expected four results, got: {}", stdout);
    assert!(stdout.contains("[PNG File]"));
}

#[test]
fn test_search_keyword() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_ma(&config_path, &["search", "rust programming"]);
    assert!(success, "search failed");
    assert!(stdout.contains("notes/readme.md"), "got: {}", stdout);
    assert!(stdout.contains("title: notes/readme | # Hello"), "got: {}", stdout);
    assert!(!stdout.contains("todo.txt"));
}

#[test]
fn test_search_json_output() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_ma(&config_path, &["search", "deploy", "--json"]);
    assert!(success);
    let results: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["fileName"], "notes/todo.txt");
    assert_eq!(results[0]["displaySnippet"], "- deploy the server");
    assert_eq!(results[0]["firstLineForTitle"], "Things to do");
    assert_eq!(results[0]["extension"], ".txt");
    assert_eq!(results[0]["tag"], "NOTES");
}

#[test]
fn test_search_deterministic() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout1, _, _) = run_ma(&config_path, &["search", "o"]);
    let (stdout2, _, _) = run_ma(&config_path, &["search", "o"]);
    assert_eq!(stdout1, stdout2, "Search results should be deterministic");
}

#[test]
fn test_search_no_results() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_ma(&config_path, &["search", "xyznonexistent"]);
    assert!(success);
    assert!(stdout.contains("No results"));
}

#[test]
fn test_get_markdown_document() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_ma(&config_path, &["get", "notes/readme.md"]);
    assert!(success, "get failed: stderr={}", stderr);
    assert!(stdout.contains("Document"));
    assert!(stdout.contains("text/html"));
    assert!(stdout.contains("<h1>Hello</h1>"));
}

#[test]
fn test_get_media_document() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_ma(&config_path, &["get", "images/logo.png"]);
    assert!(success);
    assert!(stdout.contains("image/png"));
    assert!(stdout.contains("size:         8 bytes"));
}

#[test]
fn test_get_missing_document() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_ma(&config_path, &["get", "notes/missing.md"]);
    assert!(!success, "get with missing path should fail");
    assert!(
        stderr.contains("not found"),
        "Should report not found, got: {}",
        stderr
    );
}

#[test]
fn test_get_rejects_traversal() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_ma(&config_path, &["get", "../config/archive.toml"]);
    assert!(!success);
    assert!(stderr.contains("not found"), "got: {}", stderr);
}

#[test]
fn test_missing_archive_root_fails_config() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("archive.toml");
    fs::write(
        &config_path,
        format!("[archive]\nroot = \"{}/nowhere\"\n", tmp.path().display()),
    )
    .unwrap();

    let (_, stderr, success) = run_ma(&config_path, &["files"]);
    assert!(!success);
    assert!(stderr.contains("archive.root"), "got: {}", stderr);
}

#[test]
fn test_serve_rejects_invalid_bind() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_ma(&config_path, &["serve", "--bind", "nope"]);
    assert!(!success);
    assert!(stderr.contains("--bind"), "got: {}", stderr);
    assert!(stderr.contains("nope"), "got: {}", stderr);
}
