//! Metadata transformers for rulekit.
//!
//! A [`Transformer`] rewrites the metadata header of a rule document into the
//! schema a consuming tool expects. Three targets are built in:
//!
//! - `cursor`: identity, output as `.mdc` under `.cursor/rules`
//! - `copilot-instr`: `description` + `applyTo`, output as
//!   `.instructions.md` under `.github/instructions`
//! - `copilot-prompt`: built on `copilot-instr`, adds `mode`/`tools` and
//!   drops `applyTo`, output as `.prompt.md` under `.github/prompts`
//!
//! The [`TransformerRegistry`] maps target identifiers to transformers.

pub mod copilot_instructions;
pub mod copilot_prompts;
pub mod cursor;
pub mod error;
pub mod registry;
pub mod transformer;

pub use copilot_instructions::CopilotInstructionsTransformer;
pub use copilot_prompts::CopilotPromptsTransformer;
pub use cursor::CursorTransformer;
pub use error::{Error, Result};
pub use registry::{BUILTIN_COUNT, TransformerRegistry, builtin_transformers};
pub use transformer::{SOURCE_EXTENSION, TargetDefaults, Transformer};
