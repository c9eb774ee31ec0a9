//! Built-in transformers

use std::sync::Arc;

use crate::{CopilotInstructionsTransformer, CopilotPromptsTransformer, CursorTransformer, Transformer};

/// Number of built-in targets.
pub const BUILTIN_COUNT: usize = 3;

/// All built-in transformers with default configuration.
pub fn builtin_transformers() -> Vec<Arc<dyn Transformer>> {
    vec![
        Arc::new(CursorTransformer::new()),
        Arc::new(CopilotInstructionsTransformer::new()),
        Arc::new(CopilotPromptsTransformer::new()),
    ]
}
