//! Error types for rulekit-transform

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Content error: {0}")]
    Content(#[from] rulekit_content::Error),

    #[error("Unknown target '{target}' (available: {})", available.join(", "))]
    UnknownTarget {
        target: String,
        available: Vec<String>,
    },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error("Missing required field '{field}' for target {target}")]
    MissingField { target: String, field: String },

    #[error("Invalid mode '{mode}' (must be agent, edit, or chat)")]
    InvalidMode { mode: String },
}
