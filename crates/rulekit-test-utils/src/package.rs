//! [`PackageFixture`] builder for install scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Render a rule document with a `description` header.
pub fn rule_document(description: &str, body: &str) -> String {
    format!("---\ndescription: {description}\n---\n\n{body}\n")
}

/// A temporary package directory (`packages/`) and project workdir
/// (`project/`) side by side.
///
/// # Example
///
/// ```rust,no_run
/// use rulekit_test_utils::PackageFixture;
///
/// let fixture = PackageFixture::new();
/// fixture.write_rule("frontend/react.mdc", "---\ndescription: React\n---\n\nUse hooks.");
/// fixture.write_manifest("frontend", "targets: [cursor, copilot-instr]\n");
/// ```
pub struct PackageFixture {
    temp_dir: TempDir,
}

impl Default for PackageFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageFixture {
    /// Create empty `packages/` and `project/` directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("packages")).unwrap();
        fs::create_dir_all(temp_dir.path().join("project")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn package_dir(&self) -> PathBuf {
        self.root().join("packages")
    }

    pub fn workdir(&self) -> PathBuf {
        self.root().join("project")
    }

    /// Write a file at `rel` under the package directory.
    pub fn write_rule(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.package_dir().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `cursor-rules-manifest.yaml` into `package`.
    pub fn write_manifest(&self, package: &str, yaml: &str) -> PathBuf {
        self.write_rule(&format!("{package}/cursor-rules-manifest.yaml"), yaml)
    }

    /// Write `.cursor-rules-ignore` into `package`, one pattern per line.
    pub fn write_ignore(&self, package: &str, patterns: &[&str]) -> PathBuf {
        let mut content = patterns.join("\n");
        content.push('\n');
        self.write_rule(&format!("{package}/.cursor-rules-ignore"), &content)
    }

    /// Path of `rel` inside the project workdir.
    pub fn project_path(&self, rel: &str) -> PathBuf {
        self.workdir().join(rel)
    }

    /// Read a project file to a string.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, rel: &str) -> String {
        let path = self.project_path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read {}: {e}", path.display()))
    }

    /// Assert that `rel` (relative to the workdir) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let path = self.project_path(rel);
        assert!(
            fs::symlink_metadata(&path).is_ok(),
            "Expected file to exist: {}",
            path.display()
        );
    }

    /// Assert that `rel` (relative to the workdir) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let path = self.project_path(rel);
        assert!(
            fs::symlink_metadata(&path).is_err(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }

    /// Assert that the project file at `rel` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read(rel);
        assert!(
            file_content.contains(content),
            "Expected {rel} to contain {content:?}, got:\n{file_content}"
        );
    }
}
