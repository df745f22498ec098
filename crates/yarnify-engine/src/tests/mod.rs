//! Shared helpers for unit tests.

use std::path::PathBuf;
use tempfile::TempDir;

pub fn create_test_docs_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create `relative_path` under the docs dir, including parent directories.
pub fn create_test_file(docs_dir: &TempDir, relative_path: &str, content: &str) -> PathBuf {
    let path = docs_dir.path().join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}
