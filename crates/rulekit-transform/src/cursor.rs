//! Passthrough transformer for Cursor rules.

use std::sync::Arc;

use rulekit_content::Metadata;

use crate::error::Result;
use crate::transformer::{SOURCE_EXTENSION, TargetDefaults, Transformer};

pub const TARGET: &str = "cursor";
pub const OUTPUT_DIR: &str = ".cursor/rules";

/// Identity transformer: Cursor rules are already in the source schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTransformer;

impl CursorTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for CursorTransformer {
    fn transform(&self, metadata: &Metadata, body: &str) -> Result<(Metadata, String)> {
        Ok((metadata.clone(), body.to_string()))
    }

    /// No required fields; parsed metadata is always a mapping.
    fn validate(&self, _metadata: &Metadata) -> Result<()> {
        Ok(())
    }

    fn target(&self) -> &str {
        TARGET
    }

    fn extension(&self) -> &str {
        SOURCE_EXTENSION
    }

    fn output_dir(&self) -> &str {
        OUTPUT_DIR
    }

    fn materializes(&self) -> bool {
        false
    }

    fn with_defaults(&self, _defaults: &TargetDefaults) -> Arc<dyn Transformer> {
        Arc::new(*self)
    }
}
