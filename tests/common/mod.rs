//! Common test utilities for lad integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A sandboxed working root for integration tests
pub struct TestWorkspace {
    /// Temporary directory, removed on drop
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the working root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new empty working root
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the working root, creating parent directories
    #[allow(dead_code)]
    pub fn write_file(&self, relative: &str, content: &str) {
        let file_path = self.path.join(relative);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the working root
    #[allow(dead_code)]
    pub fn file_exists(&self, relative: &str) -> bool {
        self.path.join(relative).exists()
    }
}
