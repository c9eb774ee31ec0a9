use tracing::trace;

use crate::error::{Error, ParseErrorKind, Result};
use crate::metadata::Metadata;

/// Delimiter around the metadata header.
pub const HEADER_DELIMITER: &str = "---";

/// A parsed rule document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}

impl Document {
    pub fn new(metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            metadata,
            body: body.into(),
        }
    }

    /// Parse raw file content. See [`split`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (metadata, body) = split(data)?;
        Ok(Self { metadata, body })
    }

    /// Encode back to file content. See [`marshal`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        marshal(&self.metadata, &self.body)
    }
}

/// Split raw document bytes into metadata header and body.
///
/// The input is split on [`HEADER_DELIMITER`] into at most three segments.
/// Fewer than three segments means the header is missing or unterminated.
/// The body is the third segment with surrounding whitespace trimmed; it may
/// be empty.
pub fn split(data: &[u8]) -> Result<(Metadata, String)> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::parse(ParseErrorKind::InvalidEncoding, e.to_string()))?;

    let parts: Vec<&str> = text.splitn(3, HEADER_DELIMITER).collect();
    let [_, header, body] = parts.as_slice() else {
        return Err(Error::parse(
            ParseErrorKind::MalformedHeader,
            format!("expected two '{HEADER_DELIMITER}' delimiters"),
        ));
    };

    let metadata = Metadata::from_yaml(header)?;
    trace!(keys = metadata.len(), "split document header");
    Ok((metadata, body.trim().to_string()))
}

/// Combine metadata and body into document bytes.
///
/// Output layout is the delimiter, the YAML header, the delimiter, a blank
/// line, then `body` verbatim.
///
/// Fails when the encoded header itself contains [`HEADER_DELIMITER`], since
/// [`split`] would cut the header short.
pub fn marshal(metadata: &Metadata, body: &str) -> Result<Vec<u8>> {
    let header = metadata.to_yaml()?;
    if header.contains(HEADER_DELIMITER) {
        return Err(Error::DelimiterInHeader {
            delimiter: HEADER_DELIMITER,
        });
    }

    let mut out = String::with_capacity(header.len() + body.len() + 16);
    out.push_str(HEADER_DELIMITER);
    out.push('\n');
    out.push_str(&header);
    if !header.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(HEADER_DELIMITER);
    out.push_str("\n\n");
    out.push_str(body);
    Ok(out.into_bytes())
}
