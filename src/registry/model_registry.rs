//! # Model Registry
//!
//! Thread-safe registration of flagged model types. Definitions are validated
//! once at registration and shared read-only afterwards.

use crate::error::{FlagError, Result};
use crate::models::ModelDescriptor;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_models: usize,
    pub total_flags: usize,
}

/// Registry of model descriptors keyed by model name
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    models: Arc<DashMap<String, Arc<ModelDescriptor>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model after validating its flag definitions
    pub fn register(&self, model: ModelDescriptor) -> Result<Arc<ModelDescriptor>> {
        for flag in &model.flags {
            flag.validate()?;
        }

        let mut attributes: Vec<&str> = model.flags.iter().map(|f| f.attribute.as_str()).collect();
        attributes.sort_unstable();
        if let Some(pair) = attributes.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(FlagError::Configuration(format!(
                "model '{}' attaches column '{}' to more than one flag",
                model.name, pair[0]
            )));
        }

        let name = model.name.clone();
        let model = Arc::new(model);
        match self.models.entry(name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(FlagError::DuplicateModel(name)),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&model));
                info!(
                    model = %name,
                    table = %model.table,
                    flags = model.flags.len(),
                    "📚 Registered flagged model"
                );
                Ok(model)
            }
        }
    }

    /// Look up a registered model
    pub fn get(&self, name: &str) -> Result<Arc<ModelDescriptor>> {
        self.models
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| FlagError::UnknownModel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Remove a model, returning its descriptor if it was registered
    pub fn unregister(&self, name: &str) -> Option<Arc<ModelDescriptor>> {
        let removed = self.models.remove(name).map(|(_, model)| model);
        if removed.is_some() {
            debug!(model = %name, "Unregistered flagged model");
        }
        removed
    }

    /// Registered model names, sorted
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_models: self.models.len(),
            total_flags: self.models.iter().map(|e| e.value().flags.len()).sum(),
        }
    }
}
