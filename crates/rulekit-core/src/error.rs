//! Error types for rulekit-core

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Result type for rulekit-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Source document or package absent
    NotFound,
    /// Malformed input: header, target, glob, enumerated value, name
    InvalidArgument,
    /// Environment not in a usable state
    FailedPrecondition,
    /// I/O or encoding failure
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::FailedPrecondition => "failed_precondition",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in rulekit-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The installer has no transformer registry
    #[error("No transformers configured")]
    NoRegistry,

    /// Neither a package directory nor a rule document exists under the name
    #[error("Preset or package '{name}' not found: {}", path.display())]
    NotFound { name: String, path: PathBuf },

    /// A path that must be a directory is something else
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// No explicit, environment or home-based package directory
    #[error("Cannot determine the package directory: no home directory")]
    NoPackageDir,

    /// A caller-supplied exclude pattern does not compile
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExclude { pattern: String, reason: String },

    /// Manifest present but unreadable
    #[error("Invalid manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from rulekit-fs
    #[error(transparent)]
    Fs(#[from] rulekit_fs::Error),

    /// Codec error from rulekit-content
    #[error(transparent)]
    Content(#[from] rulekit_content::Error),

    /// Transformer error from rulekit-transform
    #[error(transparent)]
    Transform(#[from] rulekit_transform::Error),

    /// Package walk error
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::NoRegistry | Self::NotADirectory { .. } | Self::NoPackageDir => {
                ErrorCode::FailedPrecondition
            }
            Self::InvalidExclude { .. } | Self::Manifest { .. } => ErrorCode::InvalidArgument,
            Self::Fs(e) => fs_code(e),
            Self::Content(e) => content_code(e),
            Self::Transform(rulekit_transform::Error::Content(e)) => content_code(e),
            Self::Transform(_) => ErrorCode::InvalidArgument,
            Self::Walk(_) | Self::Io(_) => ErrorCode::Internal,
        }
    }
}

fn fs_code(error: &rulekit_fs::Error) -> ErrorCode {
    match error {
        rulekit_fs::Error::InvalidPath { .. } => ErrorCode::InvalidArgument,
        rulekit_fs::Error::SourceMissing { .. } => ErrorCode::NotFound,
        _ => ErrorCode::Internal,
    }
}

fn content_code(error: &rulekit_content::Error) -> ErrorCode {
    match error {
        rulekit_content::Error::Parse { .. } => ErrorCode::InvalidArgument,
        rulekit_content::Error::Encode(_) | rulekit_content::Error::DelimiterInHeader { .. } => {
            ErrorCode::Internal
        }
    }
}

/// Why a directory-linking tool could not place a unit.
///
/// Never fatal: the resolver records it and falls back.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("{program} not found on PATH")]
    Unavailable { program: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}: {output}", status.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Failed {
        program: String,
        status: Option<i32>,
        output: String,
    },
}
