//! Transformer for GitHub Copilot prompt files.

use std::sync::Arc;

use rulekit_content::Metadata;

use crate::copilot_instructions::{CopilotInstructionsTransformer, require, scalar_to_string};
use crate::error::{Error, Result};
use crate::transformer::{TargetDefaults, Transformer};

pub const TARGET: &str = "copilot-prompt";
pub const EXTENSION: &str = ".prompt.md";
pub const OUTPUT_DIR: &str = ".github/prompts";

pub const DEFAULT_MODE: &str = "chat";

/// Values accepted for the `mode` field.
pub const VALID_MODES: [&str; 3] = ["agent", "edit", "chat"];

/// Builds on the instructions transform, then adds `mode` and `tools` and
/// drops `applyTo`.
#[derive(Debug, Clone)]
pub struct CopilotPromptsTransformer {
    instructions: CopilotInstructionsTransformer,
    default_mode: String,
    default_tools: Vec<String>,
}

impl Default for CopilotPromptsTransformer {
    fn default() -> Self {
        Self {
            instructions: CopilotInstructionsTransformer::default(),
            default_mode: DEFAULT_MODE.to_string(),
            default_tools: Vec::new(),
        }
    }
}

impl CopilotPromptsTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the underlying instructions transformer (budget, globs).
    pub fn with_instructions(mut self, instructions: CopilotInstructionsTransformer) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn with_default_mode(mut self, mode: impl Into<String>) -> Self {
        self.default_mode = mode.into();
        self
    }

    pub fn with_default_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_mode(&self) -> &str {
        &self.default_mode
    }

    pub fn default_tools(&self) -> &[String] {
        &self.default_tools
    }
}

impl Transformer for CopilotPromptsTransformer {
    fn transform(&self, metadata: &Metadata, body: &str) -> Result<(Metadata, String)> {
        let (mut out, body) = self.instructions.transform(metadata, body)?;

        if !out.contains_key("mode") {
            out.insert("mode", self.default_mode.as_str());
        }
        if !out.contains_key("tools") && !self.default_tools.is_empty() {
            out.insert("tools", self.default_tools.clone());
        }
        out.remove("applyTo");

        Ok((out, body))
    }

    fn validate(&self, metadata: &Metadata) -> Result<()> {
        require(metadata, TARGET, "description")?;
        require(metadata, TARGET, "mode")?;

        match metadata.get_str("mode") {
            Some(mode) if VALID_MODES.contains(&mode) => Ok(()),
            Some(mode) => Err(Error::InvalidMode {
                mode: mode.to_string(),
            }),
            None => Err(Error::InvalidMode {
                mode: metadata
                    .get("mode")
                    .and_then(scalar_to_string)
                    .unwrap_or_else(|| "<non-scalar>".to_string()),
            }),
        }
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

    fn with_defaults(&self, defaults: &TargetDefaults) -> Arc<dyn Transformer> {
        let mut configured = self.clone();
        if let Some(mode) = &defaults.default_mode {
            configured.default_mode = mode.clone();
        }
        if let Some(tools) = &defaults.default_tools {
            configured.default_tools = tools.clone();
        }
        Arc::new(configured)
    }
}
