//! Shared helpers for krill-core integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

/// Root directory of the workspace `test-fixtures` folder.
fn fixtures_root() -> PathBuf {
    // Walk up from the crate to the workspace root.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Absolute path to a Python fixture.
pub fn python_fixture(name: &str) -> PathBuf {
    fixtures_root().join("python").join(name)
}

/// Helper: create a temporary directory.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Write `source` to `<dir>/<name>` and return its path.
pub fn write_source(dir: &tempfile::TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).unwrap();
    path
}
