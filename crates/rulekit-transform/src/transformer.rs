//! Transformer trait shared by all targets

use std::fmt::Debug;
use std::sync::Arc;

use rulekit_content::Metadata;

use crate::error::Result;

/// Extension of rule documents in a package.
pub const SOURCE_EXTENSION: &str = ".mdc";

/// Rewrites a rule document's metadata into one target's schema.
///
/// Implementations hold only immutable configuration, so one instance serves
/// any number of documents.
pub trait Transformer: Debug + Send + Sync {
    /// Rewrite metadata and body for this target.
    fn transform(&self, metadata: &Metadata, body: &str) -> Result<(Metadata, String)>;

    /// Check transformed metadata against the target's required fields.
    ///
    /// Callers decide whether a failure is a warning or fatal.
    fn validate(&self, metadata: &Metadata) -> Result<()>;

    /// Target identifier, e.g. `cursor` or `copilot-instr`.
    fn target(&self) -> &str;

    /// Output file extension, e.g. `.instructions.md`.
    fn extension(&self) -> &str;

    /// Output directory relative to the project root.
    fn output_dir(&self) -> &str;

    /// Whether output must be written in full.
    ///
    /// Rewritten schemas are read by tools that cannot follow links or
    /// `@file` references, so only the passthrough target returns `false`.
    fn materializes(&self) -> bool {
        true
    }

    /// A copy of this transformer with per-package defaults applied.
    fn with_defaults(&self, defaults: &TargetDefaults) -> Arc<dyn Transformer>;

    /// Output file name for a source file name or relative path.
    fn output_name(&self, source: &str) -> String {
        let stem = source.strip_suffix(SOURCE_EXTENSION).unwrap_or(source);
        format!("{stem}{}", self.extension())
    }
}

/// Per-target defaults a package manifest may override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetDefaults {
    pub default_mode: Option<String>,
    pub default_tools: Option<Vec<String>>,
}

impl TargetDefaults {
    pub fn is_empty(&self) -> bool {
        self.default_mode.is_none() && self.default_tools.is_none()
    }
}
