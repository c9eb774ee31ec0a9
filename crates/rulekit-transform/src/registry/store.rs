//! Transformer registry storage

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::transformer::Transformer;

/// Lookup of transformers by target identifier.
#[derive(Debug, Default, Clone)]
pub struct TransformerRegistry {
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in targets.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for transformer in super::builtin_transformers() {
            registry.register(transformer);
        }
        registry
    }

    /// Register a transformer under its own target identifier, replacing any
    /// previous one.
    pub fn register(&mut self, transformer: Arc<dyn Transformer>) {
        self.transformers
            .insert(transformer.target().to_string(), transformer);
    }

    /// Look up the transformer for `target`.
    pub fn get(&self, target: &str) -> Result<Arc<dyn Transformer>> {
        self.transformers
            .get(target)
            .cloned()
            .ok_or_else(|| Error::UnknownTarget {
                target: target.to_string(),
                available: self.list().into_iter().map(String::from).collect(),
            })
    }

    pub fn contains(&self, target: &str) -> bool {
        self.transformers.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Registered target identifiers (sorted).
    pub fn list(&self) -> Vec<&str> {
        let mut targets: Vec<_> = self.transformers.keys().map(String::as_str).collect();
        targets.sort_unstable();
        targets
    }
}
