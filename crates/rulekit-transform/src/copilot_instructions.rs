//! Transformer for GitHub Copilot instruction files.

use std::sync::Arc;

use rulekit_content::{Metadata, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::transformer::{TargetDefaults, Transformer};

pub const TARGET: &str = "copilot-instr";
pub const EXTENSION: &str = ".instructions.md";
pub const OUTPUT_DIR: &str = ".github/instructions";

/// Description used when the source has none.
pub const DEFAULT_DESCRIPTION: &str = "Imported from Cursor rules";

/// Appended to a body cut down to the token budget.
pub const TRUNCATION_MARKER: &str = "\n\n[... truncated for token limit ...]";

/// Rough characters-per-token ratio for the body budget.
pub const CHARS_PER_TOKEN: usize = 4;

pub const DEFAULT_MAX_TOKENS: usize = 2000;

/// Maps Cursor metadata onto the Copilot instructions schema.
///
/// Output metadata holds exactly `description` and `applyTo`; every other
/// source field is dropped.
#[derive(Debug, Clone)]
pub struct CopilotInstructionsTransformer {
    default_globs: Vec<String>,
    max_tokens: usize,
    validate_globs: bool,
}

impl Default for CopilotInstructionsTransformer {
    fn default() -> Self {
        Self {
            default_globs: vec!["**".to_string()],
            max_tokens: DEFAULT_MAX_TOKENS,
            validate_globs: true,
        }
    }
}

impl CopilotInstructionsTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns used when the source declares none.
    pub fn with_default_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_globs = globs.into_iter().map(Into::into).collect();
        self
    }

    /// Body budget in tokens (`max_tokens * 4` characters).
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_glob_validation(mut self, enabled: bool) -> Self {
        self.validate_globs = enabled;
        self
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Read `apply_to` (string or list) or `applyTo` (string) as one
    /// comma-joined pattern string. Empty when neither yields anything.
    fn extract_apply_to(metadata: &Metadata) -> String {
        match metadata.get("apply_to") {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Sequence(items)) => {
                return items
                    .iter()
                    .filter_map(scalar_to_string)
                    .collect::<Vec<_>>()
                    .join(",");
            }
            _ => {}
        }
        metadata.get_str("applyTo").unwrap_or_default().to_string()
    }

    /// Check every comma-separated pattern. The first malformed one fails.
    ///
    /// A run of `*` counts as a single wildcard, so `**.ts` and `src/**.rs`
    /// are accepted; only malformed character classes are rejected.
    fn check_globs(patterns: &str) -> Result<()> {
        for pattern in patterns.split(',').map(str::trim) {
            glob::Pattern::new(&collapse_stars(pattern)).map_err(|e| Error::InvalidGlob {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })?;
        }
        Ok(())
    }

    /// Cut `body` to the character budget and append [`TRUNCATION_MARKER`].
    /// A body this transformer already truncated is left alone.
    fn truncate_body(&self, body: &str) -> String {
        let max_chars = self.max_tokens.saturating_mul(CHARS_PER_TOKEN);
        if let Some(kept) = body.strip_suffix(TRUNCATION_MARKER) {
            if kept.chars().count() <= max_chars {
                return body.to_string();
            }
        }
        match body.char_indices().nth(max_chars) {
            None => body.to_string(),
            Some((cut, _)) => {
                debug!(max_chars, "truncating body to token budget");
                format!("{}{TRUNCATION_MARKER}", &body[..cut])
            }
        }
    }
}

fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Transformer for CopilotInstructionsTransformer {
    fn transform(&self, metadata: &Metadata, body: &str) -> Result<(Metadata, String)> {
        let mut out = Metadata::new();

        let description = metadata.description().unwrap_or(DEFAULT_DESCRIPTION);
        out.insert("description", description);

        let mut apply_to = Self::extract_apply_to(metadata);
        if apply_to.is_empty() {
            apply_to = self.default_globs.join(",");
        }
        if self.validate_globs {
            Self::check_globs(&apply_to)?;
        }
        out.insert("applyTo", apply_to);

        Ok((out, self.truncate_body(body)))
    }

    fn validate(&self, metadata: &Metadata) -> Result<()> {
        require(metadata, TARGET, "description")?;
        require(metadata, TARGET, "applyTo")
    }

    fn target(&self) -> &str {
        TARGET
    }

    fn extension(&self) -> &str {
        EXTENSION
    }

    fn output_dir(&self) -> &str {
        OUTPUT_DIR
    }

    fn with_defaults(&self, _defaults: &TargetDefaults) -> Arc<dyn Transformer> {
        Arc::new(self.clone())
    }
}

pub(crate) fn require(metadata: &Metadata, target: &str, field: &str) -> Result<()> {
    if metadata.contains_key(field) {
        Ok(())
    } else {
        Err(Error::MissingField {
            target: target.to_string(),
            field: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_runs_collapse_to_one() {
        assert_eq!(collapse_stars("**.ts"), "*.ts");
        assert_eq!(collapse_stars("a***b/*"), "a*b/*");
        assert_eq!(collapse_stars("src/[ab]*.rs"), "src/[ab]*.rs");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let t = CopilotInstructionsTransformer::new().with_max_tokens(1);
        let out = t.truncate_body("ééééé");
        assert_eq!(out, format!("éééé{TRUNCATION_MARKER}"));
    }

    #[test]
    fn body_at_budget_is_untouched() {
        let t = CopilotInstructionsTransformer::new().with_max_tokens(2);
        assert_eq!(t.truncate_body("12345678"), "12345678");
    }

    #[test]
    fn truncated_body_is_not_cut_again() {
        let t = CopilotInstructionsTransformer::new().with_max_tokens(1);
        let once = t.truncate_body("abcdefgh");
        assert_eq!(t.truncate_body(&once), once);
    }

    #[test]
    fn list_items_are_stringified() {
        let metadata = Metadata::from_yaml("apply_to: [src/*.rs, 42]").unwrap();
        assert_eq!(
            CopilotInstructionsTransformer::extract_apply_to(&metadata),
            "src/*.rs,42"
        );
    }
}
