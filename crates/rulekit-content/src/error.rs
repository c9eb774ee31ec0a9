//! Error types for rulekit-content

use std::fmt;

/// Result type for rulekit-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a document failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Fewer than two header delimiters
    MalformedHeader,
    /// Header is not a YAML key/value mapping
    InvalidMetadata,
    /// Input is not UTF-8
    InvalidEncoding,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MalformedHeader => "malformed header",
            Self::InvalidMetadata => "invalid metadata",
            Self::InvalidEncoding => "invalid encoding",
        };
        f.write_str(label)
    }
}

/// Errors that can occur in rulekit-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse document ({kind}): {message}")]
    Parse {
        kind: ParseErrorKind,
        message: String,
    },

    #[error("Failed to encode metadata: {0}")]
    Encode(#[source] serde_yaml::Error),

    /// The encoded header would end early when read back
    #[error("Encoded metadata contains the header delimiter '{delimiter}'")]
    DelimiterInHeader { delimiter: &'static str },
}

impl Error {
    pub fn parse(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            message: message.into(),
        }
    }

    /// The parse failure kind, if this is a parse error.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Self::Parse { kind, .. } => Some(*kind),
            Self::Encode(_) | Self::DelimiterInHeader { .. } => None,
        }
    }
}
