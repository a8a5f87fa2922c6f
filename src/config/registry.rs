// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::RegistryError;
use crate::traits::Transformer;

/// Registry mapping transformer names to instantiated transformers.
///
/// Built once at process start and read-only during execution. The last
/// registration for a given name wins; lookups either succeed or fail with
/// an explicit [`RegistryError::UnknownTransformer`] and never substitute.
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// Register a transformer under its declared name
    pub fn register(&mut self, transformer: Arc<dyn Transformer>) {
        self.transformers
            .insert(transformer.name().to_string(), transformer);
    }

    /// Get a transformer by name
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Transformer>, RegistryError> {
        self.transformers
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTransformer {
                name: name.to_string(),
            })
    }

    /// Check whether a transformer is registered
    pub fn contains(&self, name: &str) -> bool {
        self.transformers.contains_key(name)
    }

    /// All registered names, sorted. For introspection and listing only;
    /// the executor never iterates the registry.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.transformers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("transformer_count", &self.transformers.len())
            .field("transformer_names", &self.list())
            .finish()
    }
}
