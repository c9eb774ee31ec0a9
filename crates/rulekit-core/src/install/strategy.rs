use std::fmt;

use serde::Serialize;

/// How a file was placed at its destination.
///
/// Ordered by strength: a package reports the strongest strategy used by
/// any of its files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStrategy {
    #[default]
    Unknown,
    Copy,
    Symlink,
    Stow,
}

impl InstallStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Copy => "copy",
            Self::Symlink => "symlink",
            Self::Stow => "stow",
        }
    }
}

impl fmt::Display for InstallStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
