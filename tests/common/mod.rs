//! Common test utilities for integration tests.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test fixture that creates a temporary blog site.
pub struct TestSite {
    #[allow(dead_code)] // Kept to prevent TempDir from being dropped
    dir: TempDir,
    pub root: PathBuf,
}

impl TestSite {
    /// Creates an empty site with a .cafecito directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        // Canonicalize to resolve symlinks (e.g., /var -> /private/var on macOS)
        let root = dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp directory");

        std::fs::create_dir(root.join(".cafecito")).expect("Failed to create .cafecito directory");

        Self { dir, root }
    }

    /// Writes `.cafecito/config.toml`.
    pub fn write_config(&self, toml: &str) {
        std::fs::write(self.root.join(".cafecito/config.toml"), toml)
            .expect("Failed to write config");
    }

    /// Creates a post under `content/blog` with the given frontmatter lines.
    pub fn create_post(&self, path: &str, frontmatter: &[(&str, &str)], body: &str) -> PathBuf {
        let mut content = String::from("---\n");
        for (key, value) in frontmatter {
            content.push_str(&format!("{}: {}\n", key, value));
        }
        content.push_str("---\n\n");
        content.push_str(body);
        self.create_file(&format!("content/blog/{path}"), &content)
    }

    /// Creates a file relative to the root.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Returns the path to the root directory.
    pub fn path(&self) -> &Path {
        &self.root
    }
}
