//! [`TempConfigDir`] builder for on-disk config layouts.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory to lay out config files in.
///
/// # Example
///
/// ```rust,no_run
/// use cascade_test_utils::TempConfigDir;
///
/// let dir = TempConfigDir::new()
///     .with_properties("cascade.properties", &[("color", "red")])
///     .with_file("app.yml", "db:\n  url: jdbc:h2\n");
/// dir.assert_file_exists("app.yml");
/// ```
pub struct TempConfigDir {
    temp_dir: TempDir,
}

impl Default for TempConfigDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TempConfigDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TempConfigDir::new: failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        self.write(relative, content);
        self
    }

    /// Write a `.properties` file from key/value pairs.
    pub fn with_properties(self, relative: &str, entries: &[(&str, &str)]) -> Self {
        let content: String = entries
            .iter()
            .map(|(key, value)| format!("{key}={value}\n"))
            .collect();
        self.with_file(relative, &content)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let full_path = self.path(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
