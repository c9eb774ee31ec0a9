//! Install configuration
//!
//! Placement switches come from the environment but are captured in an
//! [`InstallConfig`] value and passed into the resolver, so nothing below
//! the caller reads process state.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Prefer symlinks over reference stubs.
pub const ENV_SYMLINK: &str = "CURSOR_RULES_SYMLINK";
/// Try GNU stow before symlinking.
pub const ENV_USE_GNUSTOW: &str = "CURSOR_RULES_USE_GNUSTOW";
/// Override the shared package directory.
pub const ENV_PACKAGE_DIR: &str = "CURSOR_RULES_PACKAGE_DIR";

/// How installed files may be placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallConfig {
    pub prefer_symlink: bool,
    pub prefer_stow: bool,
}

impl InstallConfig {
    /// Read switches from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read switches through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            prefer_symlink: flag_enabled(lookup(ENV_SYMLINK)),
            prefer_stow: flag_enabled(lookup(ENV_USE_GNUSTOW)),
        }
    }

    /// Whether link placement is on. Asking for stow implies symlinks.
    pub fn links_enabled(&self) -> bool {
        self.prefer_symlink || self.prefer_stow
    }
}

fn flag_enabled(value: Option<String>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v == "1" || v.eq_ignore_ascii_case("true")
    })
}

/// Resolve the shared package directory.
///
/// Precedence: `explicit`, then `CURSOR_RULES_PACKAGE_DIR`, then
/// `~/.cursor/rules`.
pub fn resolve_package_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    resolve_package_dir_with(explicit, |key| std::env::var(key).ok(), dirs::home_dir())
}

/// [`resolve_package_dir`] with injected environment and home directory.
pub fn resolve_package_dir_with(
    explicit: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = lookup(ENV_PACKAGE_DIR)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    {
        return Ok(PathBuf::from(dir));
    }
    home.map(|h| h.join(".cursor").join("rules"))
        .ok_or(Error::NoPackageDir)
}
