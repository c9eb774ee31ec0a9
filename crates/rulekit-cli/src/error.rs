//! Error types for rulekit-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from rulekit-core
    #[error(transparent)]
    Core(#[from] rulekit_core::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Some files were not processed; details were already printed
    #[error("{failed} file(s) failed")]
    PartialFailure { failed: usize },
}
