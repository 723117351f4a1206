//! Versions file test utilities

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Write a versions file into a fresh temporary directory
pub fn create_manifest_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("versions.cfg");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

pub fn read_manifest_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
