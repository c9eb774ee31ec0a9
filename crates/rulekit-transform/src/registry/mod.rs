//! Target registry
//!
//! Maps target identifiers to transformers. Populated once at startup and
//! read-only afterwards.

mod builtins;
mod store;

pub use builtins::{BUILTIN_COUNT, builtin_transformers};
pub use store::TransformerRegistry;
