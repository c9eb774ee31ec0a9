//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Relative package paths are matched against exclude globs in this form, so
/// a pattern like `drafts/*` behaves the same on every platform. Conversion
/// to a platform-native path happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and resolves `.` and `..`
    /// segments lexically.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.is_empty() {
            segment_normalized
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    ///
    /// A single-component relative path has the parent `.`.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) if trimmed.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(_) => None,
            None if trimmed.is_empty() || trimmed == "." => None,
            None => Some(Self {
                inner: ".".to_string(),
            }),
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem (following symlinks).
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Check if this path itself is a symlink (without following it).
    pub fn is_symlink(&self) -> bool {
        std::fs::symlink_metadata(self.to_native())
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Replace a trailing suffix on the file name (e.g. `.mdc` -> `.prompt.md`).
    ///
    /// When the path does not end with `from`, `to` is appended.
    pub fn with_suffix(&self, from: &str, to: &str) -> Self {
        let stem = self.inner.strip_suffix(from).unwrap_or(&self.inner);
        Self {
            inner: format!("{stem}{to}"),
        }
    }

    /// Resolve to an absolute, canonical native path.
    pub fn canonicalize(&self) -> Result<PathBuf> {
        let native = self.to_native();
        dunce::canonicalize(&native).map_err(|e| Error::io(native, e))
    }
}

/// Lexically normalize a forward-slash path.
///
/// Leading `..` segments of relative paths are kept; on rooted paths they
/// stop at the root.
fn clean(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let (prefix, rest) = if path.starts_with("//") && !path.starts_with("///") {
        ("//", &path[2..])
    } else if path.starts_with('/') {
        ("/", path.trim_start_matches('/'))
    } else {
        ("", path)
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if prefix.is_empty() => parts.push(".."),
                _ => {}
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    if prefix.is_empty() && body.is_empty() {
        ".".to_string()
    } else {
        format!("{prefix}{body}")
    }
}

/// Validate a package or document name requested by a caller.
///
/// Names may contain `/` for nested packages (e.g. `frontend/react`) but must
/// not escape the package directory.
pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_path(name, "empty name"));
    }
    if name.contains('\0') {
        return Err(Error::invalid_path(name, "null byte in name"));
    }
    if name.contains('\\') {
        return Err(Error::invalid_path(name, "name contains backslashes"));
    }
    if name.starts_with('/') || Path::new(name).is_absolute() {
        return Err(Error::invalid_path(name, "name is an absolute path"));
    }
    for (idx, part) in name.split('/').enumerate() {
        if part.is_empty() {
            return Err(Error::invalid_path(
                name,
                format!("empty component at index {idx}"),
            ));
        }
        if part == "." || part == ".." {
            return Err(Error::invalid_path(
                name,
                format!("invalid component '{part}' at index {idx}"),
            ));
        }
        if part.starts_with('.') {
            return Err(Error::invalid_path(
                name,
                format!("component starts with '.' at index {idx}"),
            ));
        }
    }
    Ok(())
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
